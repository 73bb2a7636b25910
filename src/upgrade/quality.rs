//! Quality requirements a track must meet to be left alone.

use serde::{Deserialize, Serialize};

use crate::model::Track;

/// Codecs accepted in lossless mode
pub const LOSSLESS_CODECS: &[&str] = &["alac", "flac"];

/// Minimum acceptable mp3 bitrate (kbps)
pub const MIN_MP3_BITRATE: u32 = 320;

/// Minimum acceptable aac bitrate (kbps)
pub const MIN_AAC_BITRATE: u32 = 256;

/// How strict the quality bar is for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRequirement {
    /// Every track is considered substandard
    ForceAll,
    /// Only lossless codecs pass
    ForceLossless,
    /// Low-bitrate mp3 and aac fail, everything else passes
    #[default]
    Default,
}

/// Whether `track` already meets `requirement`.
///
/// Under [`QualityRequirement::Default`] an mp3 or aac track with an
/// unknown bitrate fails.
pub fn meets_requirements(track: &Track, requirement: QualityRequirement) -> bool {
    match requirement {
        QualityRequirement::ForceAll => false,
        QualityRequirement::ForceLossless => LOSSLESS_CODECS.contains(&track.codec.as_str()),
        QualityRequirement::Default => {
            let below = |min: u32| track.bitrate.is_none_or(|b| b < min);
            match track.codec.as_str() {
                "mp3" => !below(MIN_MP3_BITRATE),
                "aac" => !below(MIN_AAC_BITRATE),
                _ => true,
            }
        }
    }
}
