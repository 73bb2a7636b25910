//! Adapter layer: Convert Plex DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::model::{Connection, Playlist, PlaylistType, Resource, Track};

/// Convert a track entry to a [`Track`].
///
/// Codec, bitrate and duration come from the first media entry; Plex lists
/// the primary encoding first.
pub fn to_track(metadata: dto::TrackMetadata) -> Track {
    let media = metadata.media.into_iter().next();
    let (codec, bitrate, media_duration) = match media {
        Some(m) => (m.audio_codec.unwrap_or_default(), m.bitrate, m.duration),
        None => (String::new(), None, None),
    };

    Track {
        id: metadata.rating_key,
        playlist_item_id: metadata.playlist_item_id,
        title: metadata.title,
        original_artist: metadata.original_title.filter(|a| !a.is_empty()),
        album_artist: metadata.grandparent_title.unwrap_or_default(),
        album: metadata.parent_title.unwrap_or_default(),
        duration_ms: media_duration.or(metadata.duration).unwrap_or(0),
        codec: codec.to_lowercase(),
        bitrate,
    }
}

/// Convert a playlist entry to a [`Playlist`].
pub fn to_playlist(metadata: dto::PlaylistMetadata) -> Playlist {
    Playlist {
        id: metadata.rating_key,
        title: metadata.title,
        summary: metadata.summary,
        playlist_type: PlaylistType::parse(&metadata.playlist_type),
        smart: metadata.smart,
        item_count: metadata.leaf_count.unwrap_or(0),
    }
}

/// Convert a plex.tv resource to a [`Resource`].
pub fn to_resource(resource: dto::ResourceDto) -> Resource {
    Resource {
        name: resource.name,
        product: resource.product,
        access_token: resource.access_token.filter(|t| !t.is_empty()),
        connections: resource
            .connections
            .into_iter()
            .map(|c| Connection {
                uri: c.uri,
                local: c.local,
                relay: c.relay,
            })
            .collect(),
    }
}
