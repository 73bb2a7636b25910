//! Choosing one replacement out of the ranked candidates.
//!
//! In [`ResolveMode::Simple`] the top candidate is taken. In
//! [`ResolveMode::Manual`] the choice is delegated to a
//! [`ReplacementChooser`], which the CLI backs with a terminal prompt and
//! tests back with a closure.

use crate::model::Track;

/// How replacements are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Take the highest-ranked candidate
    Simple,
    /// Ask a [`ReplacementChooser`]
    #[default]
    Manual,
}

/// One entry of the list shown to the chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOption {
    /// 0-based position in the ranked list
    pub index: usize,
    /// Human-readable track descriptor
    pub description: String,
}

/// Capability that picks a candidate, typically by asking a human.
///
/// Receives the ranked list and returns the raw response (an index as
/// text), or `None` to keep the original. The response is validated by
/// the resolver; anything that is not an in-range index means
/// "no selection".
pub trait ReplacementChooser {
    fn choose(&mut self, original: &Track, options: &[CandidateOption]) -> Option<String>;
}

impl<F> ReplacementChooser for F
where
    F: FnMut(&Track, &[CandidateOption]) -> Option<String>,
{
    fn choose(&mut self, original: &Track, options: &[CandidateOption]) -> Option<String> {
        self(original, options)
    }
}

/// Chooser that never selects anything.
pub struct NoChoice;

impl ReplacementChooser for NoChoice {
    fn choose(&mut self, _original: &Track, _options: &[CandidateOption]) -> Option<String> {
        None
    }
}

/// Pick the replacement for `original` from `ranked`.
///
/// Returns `None` when there are no candidates, when the chooser declines,
/// or when its response is not a valid index.
pub fn resolve(
    original: &Track,
    ranked: &[Track],
    mode: ResolveMode,
    chooser: &mut dyn ReplacementChooser,
) -> Option<Track> {
    if ranked.is_empty() {
        return None;
    }

    match mode {
        ResolveMode::Simple => ranked.first().cloned(),
        ResolveMode::Manual => {
            let options: Vec<CandidateOption> = ranked
                .iter()
                .enumerate()
                .map(|(index, track)| CandidateOption {
                    index,
                    description: track.to_string(),
                })
                .collect();

            let response = chooser.choose(original, &options)?;
            match parse_selection(&response, ranked.len()) {
                Some(index) => ranked.get(index).cloned(),
                None => {
                    if !response.trim().is_empty() {
                        tracing::info!(
                            target: "upgrade",
                            response = %response.trim(),
                            "Ignoring invalid selection"
                        );
                    }
                    None
                }
            }
        }
    }
}

/// Parse a chooser response into an index below `len`.
fn parse_selection(response: &str, len: usize) -> Option<usize> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<usize>().ok().filter(|&i| i < len)
}
