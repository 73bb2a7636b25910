//! Plex API Data Transfer Objects
//!
//! These types match what Plex returns when asked for JSON.
//! DO NOT use these types outside the plex module - convert to domain types.
//!
//! Media server responses are wrapped in a `MediaContainer`; plex.tv v2
//! endpoints return bare objects/arrays.

use serde::{Deserialize, Serialize};

/// Envelope of every media server response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// `MediaContainer` holding a list of metadata items
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataContainer<T> {
    pub size: Option<u32>,
    /// Absent entirely when the list is empty
    #[serde(rename = "Metadata", default = "Vec::new")]
    pub metadata: Vec<T>,
}

/// `GET /identity`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub machine_identifier: String,
    pub version: Option<String>,
}

/// Playlist entry from `GET /playlists`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMetadata {
    pub rating_key: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub smart: bool,
    pub playlist_type: String,
    pub leaf_count: Option<u32>,
}

/// Track entry from `/playlists/{id}/items` or `/library/all?type=10`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub rating_key: String,
    pub title: String,
    /// Recording artist, when it differs from the album artist
    pub original_title: Option<String>,
    /// Album artist
    pub grandparent_title: Option<String>,
    /// Album title
    pub parent_title: Option<String>,
    /// Duration in milliseconds
    pub duration: Option<u64>,
    /// Only present on playlist items
    #[serde(rename = "playlistItemID")]
    pub playlist_item_id: Option<u64>,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
}

/// One encoding of a track
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// kbps
    pub bitrate: Option<u32>,
    pub audio_codec: Option<String>,
    pub duration: Option<u64>,
}

/// `POST https://plex.tv/users/sign_in.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignInResponse {
    pub user: SignInUser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInUser {
    pub auth_token: String,
    pub username: Option<String>,
}

/// `GET https://plex.tv/api/v2/user`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUser {
    pub username: Option<String>,
    pub auth_token: Option<String>,
}

/// Entry of `GET https://plex.tv/api/v2/resources`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDto {
    pub name: String,
    pub product: String,
    pub access_token: Option<String>,
    #[serde(default)]
    pub connections: Vec<ConnectionDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionDto {
    pub uri: String,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub relay: bool,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what Plex returns.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_playlists() {
        let json = r#"{
            "MediaContainer": {
                "size": 2,
                "Metadata": [
                    {
                        "ratingKey": "1001",
                        "key": "/playlists/1001/items",
                        "type": "playlist",
                        "title": "Favorites",
                        "summary": "Best songs",
                        "smart": false,
                        "playlistType": "audio",
                        "leafCount": 42
                    },
                    {
                        "ratingKey": "1002",
                        "title": "Recently Played",
                        "smart": true,
                        "playlistType": "audio"
                    }
                ]
            }
        }"#;

        let response: ContainerResponse<MetadataContainer<PlaylistMetadata>> =
            serde_json::from_str(json).expect("Should parse playlists");
        let items = response.media_container.metadata;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].rating_key, "1001");
        assert_eq!(items[0].summary, "Best songs");
        assert_eq!(items[0].leaf_count, Some(42));
        assert!(items[1].smart);
        assert!(items[1].summary.is_empty());
    }

    #[test]
    fn test_parse_playlist_item() {
        let json = r#"{
            "MediaContainer": {
                "size": 1,
                "Metadata": [{
                    "ratingKey": "5521",
                    "type": "track",
                    "title": "Under Pressure",
                    "originalTitle": "Queen & David Bowie",
                    "grandparentTitle": "Queen",
                    "parentTitle": "Hot Space",
                    "duration": 248000,
                    "playlistItemID": 77,
                    "Media": [{
                        "id": 1,
                        "duration": 248000,
                        "bitrate": 192,
                        "audioChannels": 2,
                        "audioCodec": "mp3",
                        "container": "mp3"
                    }]
                }]
            }
        }"#;

        let response: ContainerResponse<MetadataContainer<TrackMetadata>> =
            serde_json::from_str(json).expect("Should parse playlist items");
        let track = &response.media_container.metadata[0];

        assert_eq!(track.title, "Under Pressure");
        assert_eq!(track.original_title.as_deref(), Some("Queen & David Bowie"));
        assert_eq!(track.playlist_item_id, Some(77));
        assert_eq!(track.media[0].bitrate, Some(192));
        assert_eq!(track.media[0].audio_codec.as_deref(), Some("mp3"));
    }

    #[test]
    fn test_parse_empty_container() {
        let json = r#"{"MediaContainer": {"size": 0}}"#;
        let response: ContainerResponse<MetadataContainer<TrackMetadata>> =
            serde_json::from_str(json).expect("Should parse empty container");
        assert!(response.media_container.metadata.is_empty());
    }

    #[test]
    fn test_parse_identity() {
        let json = r#"{"MediaContainer": {"size": 0, "claimed": true,
            "machineIdentifier": "abcdef123", "version": "1.40.0.7998"}}"#;
        let response: ContainerResponse<Identity> =
            serde_json::from_str(json).expect("Should parse identity");
        assert_eq!(response.media_container.machine_identifier, "abcdef123");
    }

    #[test]
    fn test_parse_sign_in() {
        let json = r#"{"user": {"id": 1, "username": "someone", "authToken": "tok-123"}}"#;
        let response: SignInResponse = serde_json::from_str(json).expect("Should parse sign-in");
        assert_eq!(response.user.auth_token, "tok-123");
    }

    #[test]
    fn test_parse_resources() {
        let json = r#"[
            {
                "name": "Living Room",
                "product": "Plex Media Server",
                "provides": "server",
                "accessToken": "server-token",
                "connections": [
                    {"protocol": "https", "address": "10.0.0.2", "port": 32400,
                     "uri": "https://10-0-0-2.example.plex.direct:32400",
                     "local": true, "relay": false}
                ]
            },
            {
                "name": "Phone",
                "product": "Plex for Android (Mobile)",
                "provides": "client,player"
            }
        ]"#;

        let resources: Vec<ResourceDto> =
            serde_json::from_str(json).expect("Should parse resources");
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].connections.len(), 1);
        assert!(resources[0].connections[0].local);
        assert!(resources[1].connections.is_empty());
        assert!(resources[1].access_token.is_none());
    }
}
