//! In-memory catalog for testing.
//!
//! Holds playlists and canned search results, records every call so tests
//! can assert which mutations happened, and can be told to fail a
//! specific operation.
//!
//! Like a real server, every playlist entry gets its own playlist item id,
//! distinct across playlists, and removal goes by that id.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::Catalog;
use crate::error::{Error, Result};
use crate::model::{Playlist, PlaylistType, Track};

/// A call made against the mock, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    Playlists,
    Items { playlist_id: String },
    Search {
        title: String,
        artist: String,
    },
    Remove {
        playlist_id: String,
        track_ids: Vec<String>,
    },
    Add {
        playlist_id: String,
        track_ids: Vec<String>,
    },
    Create {
        title: String,
        track_ids: Vec<String>,
    },
}

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Search,
    Remove,
    Add,
}

/// Mock catalog that serves predefined playlists and search results.
#[derive(Default)]
pub struct MockCatalog {
    playlists: Mutex<Vec<(Playlist, Vec<Track>)>>,
    /// Search results keyed by the (title, artist) strings the finder sends
    search_results: HashMap<(String, String), Vec<Track>>,
    fail_on: Option<FailOn>,
    calls: Mutex<Vec<CatalogCall>>,
    next_item_id: AtomicU64,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a playlist with its items.
    pub fn with_playlist(self, playlist: Playlist, items: Vec<Track>) -> Self {
        let entries = self.entries(&items);
        self.playlists.lock().unwrap().push((playlist, entries));
        self
    }

    /// Serve `results` when searching for exactly `title` / `artist`.
    pub fn with_search(mut self, title: &str, artist: &str, results: Vec<Track>) -> Self {
        self.search_results
            .insert((title.to_string(), artist.to_string()), results);
        self
    }

    /// Make one kind of call fail with a catalog error.
    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any remove/add/create call was made.
    pub fn was_mutated(&self) -> bool {
        self.calls().iter().any(|c| {
            matches!(
                c,
                CatalogCall::Remove { .. } | CatalogCall::Add { .. } | CatalogCall::Create { .. }
            )
        })
    }

    /// Current items of the playlist with the given title.
    pub fn items_of(&self, title: &str) -> Option<Vec<Track>> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p.title == title)
            .map(|(_, items)| items.clone())
    }

    /// Copies of `tracks` as fresh playlist entries.
    fn entries(&self, tracks: &[Track]) -> Vec<Track> {
        tracks
            .iter()
            .map(|t| Track {
                playlist_item_id: Some(self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1),
                ..t.clone()
            })
            .collect()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: FailOn) -> Result<()> {
        if self.fail_on == Some(op) {
            return Err(Error::catalog(format!("mock failure on {:?}", op)));
        }
        Ok(())
    }
}

fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn playlists(&self) -> Result<Vec<Playlist>> {
        self.record(CatalogCall::Playlists);
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<Track>> {
        self.record(CatalogCall::Items {
            playlist_id: playlist.id.clone(),
        });
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p.id == playlist.id)
            .map(|(_, items)| items.clone())
            .ok_or_else(|| Error::not_found(format!("playlist {}", playlist.id)))
    }

    async fn search_tracks(&self, title: &str, artist: &str) -> Result<Vec<Track>> {
        self.record(CatalogCall::Search {
            title: title.to_string(),
            artist: artist.to_string(),
        });
        self.check(FailOn::Search)?;
        Ok(self
            .search_results
            .get(&(title.to_string(), artist.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn remove_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()> {
        self.record(CatalogCall::Remove {
            playlist_id: playlist.id.clone(),
            track_ids: ids(tracks),
        });
        self.check(FailOn::Remove)?;
        let mut playlists = self.playlists.lock().unwrap();
        let (_, items) = playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist.id)
            .ok_or_else(|| Error::not_found(format!("playlist {}", playlist.id)))?;

        for track in tracks {
            let item_id = track.playlist_item_id.ok_or_else(|| {
                Error::catalog(format!(
                    "'{}' has no playlist item id and cannot be removed",
                    track.title
                ))
            })?;
            let position = items
                .iter()
                .position(|item| item.playlist_item_id == Some(item_id))
                .ok_or_else(|| {
                    Error::not_found(format!("playlist item {} in {}", item_id, playlist.id))
                })?;
            items.remove(position);
        }
        Ok(())
    }

    async fn add_items(&self, playlist: &Playlist, tracks: &[Track]) -> Result<()> {
        self.record(CatalogCall::Add {
            playlist_id: playlist.id.clone(),
            track_ids: ids(tracks),
        });
        self.check(FailOn::Add)?;
        let entries = self.entries(tracks);
        let mut playlists = self.playlists.lock().unwrap();
        if let Some((_, items)) = playlists.iter_mut().find(|(p, _)| p.id == playlist.id) {
            items.extend(entries);
        }
        Ok(())
    }

    async fn create_playlist(
        &self,
        title: &str,
        summary: &str,
        items: &[Track],
        playlist_type: &PlaylistType,
    ) -> Result<Playlist> {
        self.record(CatalogCall::Create {
            title: title.to_string(),
            track_ids: ids(items),
        });
        let entries = self.entries(items);
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = Playlist {
            id: format!("created-{}", playlists.len() + 1),
            title: title.to_string(),
            summary: summary.to_string(),
            playlist_type: playlist_type.clone(),
            smart: false,
            item_count: items.len() as u32,
        };
        playlists.push((playlist.clone(), entries));
        Ok(playlist)
    }
}
