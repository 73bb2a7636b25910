//! Filtering and ordering search results into replacement candidates.

use crate::model::Track;

/// Turn raw search results into an ordered candidate list.
///
/// Only strict bitrate upgrades survive, and only those whose artist
/// contains the original's artist (case-insensitive). The best candidate
/// comes first: highest bitrate, ties ordered by artist name.
///
/// An original with unknown bitrate counts as bitrate 0. Case is compared
/// with `to_lowercase`, which is not full case folding: "Straße" and
/// "STRASSE" do not match.
pub fn rank(original: &Track, raw_candidates: Vec<Track>) -> Vec<Track> {
    let original_bitrate = original.bitrate.unwrap_or(0);
    let original_artist = original.artist().to_lowercase();

    let mut candidates: Vec<Track> = raw_candidates
        .into_iter()
        .filter(|c| c.bitrate.is_some_and(|b| b > original_bitrate))
        .filter(|c| c.artist().to_lowercase().contains(&original_artist))
        .collect();

    // Two stable sorts: artist name is only a tie-break for bitrate.
    candidates.sort_by(|a, b| a.artist().cmp(b.artist()));
    candidates.sort_by(|a, b| b.bitrate.cmp(&a.bitrate));

    candidates
}
