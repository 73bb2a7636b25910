//! Core data models shared by the upgrade engine and the Plex client.
//!
//! These types are OUR types - the Plex JSON shapes live in
//! [`crate::plex::dto`] and get converted into these via the adapter.
//!
//! A [`Track`] is an immutable snapshot of one library item as it was read
//! from the server. A [`Playlist`] is a handle to a server-side playlist;
//! its items are fetched separately because they change when we mutate it.

use std::fmt;

/// A single audio track in the remote library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable catalog identifier (Plex `ratingKey`)
    pub id: String,
    /// Position-independent id of this entry inside a playlist, if the
    /// track was read as a playlist item
    pub playlist_item_id: Option<u64>,
    /// Track title
    pub title: String,
    /// Artist of the original recording (Plex `originalTitle`)
    pub original_artist: Option<String>,
    /// Album-level artist (Plex `grandparentTitle`)
    pub album_artist: String,
    /// Album title
    pub album: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Audio codec as reported by the server ("mp3", "flac", ...)
    pub codec: String,
    /// Bitrate in kbps, if the server knows it
    pub bitrate: Option<u32>,
}

impl Track {
    /// The artist used for searching, matching and display.
    ///
    /// The recording artist wins when present; otherwise the album artist.
    pub fn artist(&self) -> &str {
        match self.original_artist.as_deref() {
            Some(artist) if !artist.is_empty() => artist,
            _ => &self.album_artist,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}) [{}][{}]",
            self.artist(),
            self.title,
            self.album,
            format_duration(self.duration_ms),
            self.codec
        )?;
        match self.bitrate {
            Some(bitrate) => write!(f, "[{}]", bitrate),
            None => write!(f, "[?]"),
        }
    }
}

/// Format milliseconds as `mm:ss`.
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Kind of content a playlist holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistType {
    Audio,
    Video,
    Photo,
    Other(String),
}

impl PlaylistType {
    /// Parse the server's `playlistType` string.
    pub fn parse(value: &str) -> Self {
        match value {
            "audio" => Self::Audio,
            "video" => Self::Video,
            "photo" => Self::Photo,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire name used when creating a playlist.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Photo => "photo",
            Self::Other(other) => other,
        }
    }
}

/// A playlist on the media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Catalog identifier (Plex `ratingKey`)
    pub id: String,
    pub title: String,
    pub summary: String,
    pub playlist_type: PlaylistType,
    /// Dynamically computed playlists cannot be edited
    pub smart: bool,
    /// Number of items as reported in the listing
    pub item_count: u32,
}

impl Playlist {
    /// Only static audio playlists can be upgraded.
    pub fn is_upgradeable(&self) -> bool {
        !self.smart && self.playlist_type == PlaylistType::Audio
    }
}

/// A device registered to a plex.tv account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    /// Product name, e.g. "Plex Media Server"
    pub product: String,
    /// Token to use against this resource (falls back to the account token)
    pub access_token: Option<String>,
    /// Known ways to reach the resource
    pub connections: Vec<Connection>,
}

/// Product name of servers that host libraries and playlists.
pub const MEDIA_SERVER_PRODUCT: &str = "Plex Media Server";

impl Resource {
    /// Whether this resource is a media server we can upgrade playlists on.
    pub fn is_media_server(&self) -> bool {
        self.product == MEDIA_SERVER_PRODUCT
    }

    /// Connections in the order they should be tried: local, remote, relay.
    pub fn ordered_connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<&Connection> = self.connections.iter().collect();
        connections.sort_by_key(|c| (c.relay, !c.local));
        connections
    }
}

/// One address a resource can be reached at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub uri: String,
    pub local: bool,
    pub relay: bool,
}
