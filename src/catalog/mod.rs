//! The remote catalog as seen by the upgrade engine.
//!
//! The engine only ever talks to the media server through [`Catalog`], so
//! tests can substitute [`mocks::MockCatalog`] while production code uses
//! [`crate::plex::PlexServer`].
//!
//! # Example
//!
//! ```ignore
//! use plex_upgrade::catalog::Catalog;
//!
//! async fn count<C: Catalog>(catalog: &C, playlist: &Playlist) -> Result<usize> {
//!     Ok(catalog.playlist_items(playlist).await?.len())
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Playlist, PlaylistType, Track};

#[cfg(test)]
pub mod mocks;

/// A queryable, mutable library of tracks and playlists.
///
/// Every call is a single request-level operation; implementations do not
/// retry. Errors propagate to the caller unchanged.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All playlists on the server, smart ones included.
    async fn playlists(&self) -> Result<Vec<Playlist>>;

    /// Current items of a playlist, in playlist order.
    async fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<Track>>;

    /// Tracks whose title and artist match the given strings.
    ///
    /// May return nothing, and may include the track being upgraded.
    async fn search_tracks(&self, title: &str, artist: &str) -> Result<Vec<Track>>;

    /// Remove `tracks` from `playlist` as one batch.
    async fn remove_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()>;

    /// Append `tracks` to `playlist` as one batch.
    async fn add_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()>;

    /// Create a new playlist holding `items`.
    async fn create_playlist(
        &self,
        title: &str,
        summary: &str,
        items: &[Track],
        playlist_type: &PlaylistType,
    ) -> Result<Playlist>;
}

/// Playlists that can be upgraded: static audio playlists only.
pub async fn upgradeable_playlists<C: Catalog + ?Sized>(catalog: &C) -> Result<Vec<Playlist>> {
    Ok(catalog
        .playlists()
        .await?
        .into_iter()
        .filter(Playlist::is_upgradeable)
        .collect())
}
