//! Searching the catalog for other copies of a track.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::Track;

/// Strip punctuation, keeping word characters and whitespace.
///
/// Word characters are `char::is_alphanumeric` plus `_`, so combining
/// marks with the Alphabetic property survive too.
///
/// Playlist entries and library entries often disagree on stylized quotes,
/// brackets and dashes, which would otherwise defeat an exact search.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Query the catalog for tracks matching `title` and `artist`.
///
/// Returns whatever the catalog reports; errors are not retried.
pub async fn find_candidates<C: Catalog + ?Sized>(
    catalog: &C,
    title: &str,
    artist: &str,
) -> Result<Vec<Track>> {
    let title = normalize(title);
    let artist = normalize(artist);
    tracing::debug!(target: "upgrade", %title, %artist, "Searching for candidates");
    catalog.search_tracks(&title, &artist).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mocks::{CatalogCall, FailOn, MockCatalog};
    use crate::model::fixtures::track;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Don’t Stop Me Now"), "Dont Stop Me Now");
        assert_eq!(normalize("Song (Live) - 2011 Remaster"), "Song Live  2011 Remaster");
        assert_eq!(normalize("AC/DC"), "ACDC");
        assert_eq!(normalize("snake_case"), "snake_case");
    }

    #[test]
    fn test_normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize("Sigur Rós!"), "Sigur Rós");
        assert_eq!(normalize("Björk"), "Björk");
        assert_eq!(normalize("Beyoncé «Halo»"), "Beyoncé Halo");
    }

    #[tokio::test]
    async fn test_find_candidates_sends_normalized_query() {
        let catalog = MockCatalog::new().with_search(
            "Dont Stop Me Now",
            "Queen",
            vec![track("9", "Queen", "flac", Some(900))],
        );

        let results = find_candidates(&catalog, "Don't Stop Me Now", "Queen.")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(
            catalog.calls(),
            vec![CatalogCall::Search {
                title: "Dont Stop Me Now".to_string(),
                artist: "Queen".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_find_candidates_empty() {
        let catalog = MockCatalog::new();
        let results = find_candidates(&catalog, "Nothing", "Nobody").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_find_candidates_propagates_errors() {
        let catalog = MockCatalog::new().failing_on(FailOn::Search);
        let result = find_candidates(&catalog, "Song", "Artist").await;
        assert!(result.is_err());
    }
}
