//! Plex Media Server HTTP client
//!
//! A [`PlexServer`] is a connection to one server, authenticated with a
//! token. It implements [`Catalog`] so the upgrade engine can use it.
//!
//! ## API Quirks
//!
//! - Playlist items are removed one at a time by their `playlistItemID`,
//!   not by the track's `ratingKey`. The batch is issued back to back.
//! - Items are added and playlists created through a `server://` URI that
//!   names the server's `machineIdentifier` and a comma-separated list of
//!   rating keys.
//! - Track search across all libraries is `/library/all?type=10`.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use super::{adapter, dto, error_for_status, http_client};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::model::{Playlist, PlaylistType, Track};

/// Plex metadata type number for tracks
const TRACK_TYPE: &str = "10";

/// A connected Plex Media Server.
pub struct PlexServer {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    machine_identifier: String,
}

impl PlexServer {
    /// Connect to the server at `base_url` and read its identity.
    pub async fn connect(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut server = Self {
            http_client: http_client()?,
            base_url,
            token: token.into(),
            machine_identifier: String::new(),
        };

        let identity: dto::ContainerResponse<dto::Identity> =
            server.get_json("/identity", &[]).await?;
        server.machine_identifier = identity.media_container.machine_identifier;

        tracing::info!(
            target: "plex::client",
            url = %server.base_url,
            machine = %server.machine_identifier,
            "Connected to Plex Media Server"
        );
        Ok(server)
    }

    /// Build the `server://` URI that references library items.
    fn library_uri(&self, tracks: &[Track]) -> String {
        let keys: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        library_uri(&self.machine_identifier, &keys)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(target: "plex::client", %method, %url, "Request");

        let response = self
            .http_client
            .request(method, &url)
            .header("X-Plex-Token", &self.token)
            .query(query)
            .send()
            .await?;

        error_for_status(response.status(), &url)?;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.send(Method::GET, path, query)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }

    async fn get_tracks(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Track>> {
        let response: dto::ContainerResponse<dto::MetadataContainer<dto::TrackMetadata>> =
            self.get_json(path, query).await?;
        Ok(response
            .media_container
            .metadata
            .into_iter()
            .map(adapter::to_track)
            .collect())
    }
}

/// `server://{machine}/com.plexapp.plugins.library/library/metadata/{keys}`
fn library_uri(machine_identifier: &str, rating_keys: &[&str]) -> String {
    format!(
        "server://{}/com.plexapp.plugins.library/library/metadata/{}",
        machine_identifier,
        rating_keys.join(",")
    )
}

#[async_trait]
impl Catalog for PlexServer {
    async fn playlists(&self) -> Result<Vec<Playlist>> {
        let response: dto::ContainerResponse<dto::MetadataContainer<dto::PlaylistMetadata>> =
            self.get_json("/playlists", &[("playlistType", "audio")]).await?;
        Ok(response
            .media_container
            .metadata
            .into_iter()
            .map(adapter::to_playlist)
            .collect())
    }

    async fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<Track>> {
        self.get_tracks(&format!("/playlists/{}/items", playlist.id), &[])
            .await
    }

    async fn search_tracks(&self, title: &str, artist: &str) -> Result<Vec<Track>> {
        self.get_tracks(
            "/library/all",
            &[("type", TRACK_TYPE), ("title", title), ("artist", artist)],
        )
        .await
    }

    async fn remove_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()> {
        for track in tracks {
            let item_id = track.playlist_item_id.ok_or_else(|| {
                Error::catalog(format!(
                    "'{}' has no playlist item id and cannot be removed",
                    track.title
                ))
            })?;
            self.send(
                Method::DELETE,
                &format!("/playlists/{}/items/{}", playlist.id, item_id),
                &[],
            )
            .await?;
        }
        tracing::info!(
            target: "plex::client",
            playlist = %playlist.title,
            count = tracks.len(),
            "Removed playlist items"
        );
        Ok(())
    }

    async fn add_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()> {
        let uri = self.library_uri(tracks);
        self.send(
            Method::PUT,
            &format!("/playlists/{}/items", playlist.id),
            &[("uri", uri.as_str())],
        )
        .await?;
        tracing::info!(
            target: "plex::client",
            playlist = %playlist.title,
            count = tracks.len(),
            "Added playlist items"
        );
        Ok(())
    }

    async fn create_playlist(
        &self,
        title: &str,
        summary: &str,
        items: &[Track],
        playlist_type: &PlaylistType,
    ) -> Result<Playlist> {
        if items.is_empty() {
            return Err(Error::catalog("a playlist must be created with items"));
        }

        let uri = self.library_uri(items);
        let response: dto::ContainerResponse<dto::MetadataContainer<dto::PlaylistMetadata>> = self
            .send(
                Method::POST,
                "/playlists",
                &[
                    ("uri", uri.as_str()),
                    ("type", playlist_type.as_str()),
                    ("title", title),
                    ("smart", "0"),
                ],
            )
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        let mut playlist = response
            .media_container
            .metadata
            .into_iter()
            .next()
            .map(adapter::to_playlist)
            .ok_or_else(|| Error::Parse("create playlist returned no playlist".to_string()))?;

        if !summary.is_empty() {
            self.send(
                Method::PUT,
                &format!("/playlists/{}", playlist.id),
                &[("summary", summary)],
            )
            .await?;
            playlist.summary = summary.to_string();
        }

        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_uri() {
        assert_eq!(
            library_uri("abc123", &["1", "22", "333"]),
            "server://abc123/com.plexapp.plugins.library/library/metadata/1,22,333"
        );
    }

    #[test]
    fn test_library_uri_single_item() {
        assert_eq!(
            library_uri("m", &["9"]),
            "server://m/com.plexapp.plugins.library/library/metadata/9"
        );
    }

    #[tokio::test]
    async fn test_connect_unreachable_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let result = PlexServer::connect("http://127.0.0.1:9", "token").await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
