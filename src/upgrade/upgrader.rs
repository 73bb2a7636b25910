//! Playlist upgrade orchestration.
//!
//! One run walks a playlist in order, classifies every track as kept,
//! replaced or omitted, and then (unless dry) commits the accumulated
//! changes as two batches: all removals first, then all additions.
//!
//! ```text
//! Initializing -> [Duplicating] -> Scanning -> [Committing] -> Reporting -> Done
//! ```
//!
//! The catalog is only read while scanning. If a commit fails after the
//! removal batch went through, the removals stay applied; there is no
//! rollback.

use crate::catalog::Catalog;
use crate::error::{Result, ResultExt};
use crate::model::{Playlist, Track};

use super::finder::find_candidates;
use super::quality::{QualityRequirement, meets_requirements};
use super::ranker::rank;
use super::resolver::{ReplacementChooser, ResolveMode, resolve};

/// Settings for one upgrade run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpgradeOptions {
    pub requirement: QualityRequirement,
    pub mode: ResolveMode,
    /// Work on a copy of the playlist instead of the original
    pub duplicate: bool,
    /// Analyse only, never mutate
    pub dry_run: bool,
}

impl UpgradeOptions {
    /// Options as they apply to the run: a dry run is always simple-mode
    /// (so the chooser is never consulted) and never duplicates.
    pub fn effective(self) -> Self {
        if self.dry_run {
            Self {
                mode: ResolveMode::Simple,
                duplicate: false,
                ..self
            }
        } else {
            self
        }
    }
}

/// Why a substandard track was left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitReason {
    /// Nothing in the library qualified as a replacement
    NoCandidates,
    /// Candidates existed but none was selected
    NoneSelected,
}

/// Outcome for a single playlist track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeDecision {
    /// Already meets the quality requirement
    Kept(Track),
    /// Will be swapped for a better copy
    Replaced {
        original: Track,
        replacement: Track,
    },
    /// Substandard but left alone
    Omitted {
        track: Track,
        reason: OmitReason,
    },
}

impl UpgradeDecision {
    /// The playlist track this decision is about.
    pub fn track(&self) -> &Track {
        match self {
            Self::Kept(track) => track,
            Self::Replaced { original, .. } => original,
            Self::Omitted { track, .. } => track,
        }
    }
}

/// Changes accumulated during a scan.
///
/// `items_to_add[i]` replaces `items_to_remove[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeBatch {
    pub items_to_remove: Vec<Track>,
    pub items_to_add: Vec<Track>,
    pub items_omitted: Vec<Track>,
}

impl UpgradeBatch {
    /// Fold one decision into the batch.
    pub fn record(&mut self, decision: &UpgradeDecision) {
        match decision {
            UpgradeDecision::Kept(_) => {}
            UpgradeDecision::Replaced {
                original,
                replacement,
            } => {
                self.items_to_remove.push(original.clone());
                self.items_to_add.push(replacement.clone());
            }
            UpgradeDecision::Omitted { track, .. } => self.items_omitted.push(track.clone()),
        }
    }

    /// Whether committing would change anything.
    pub fn has_changes(&self) -> bool {
        !self.items_to_remove.is_empty() || !self.items_to_add.is_empty()
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeState {
    Initializing,
    Duplicating,
    Scanning,
    Committing,
    Reporting,
    Done,
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct UpgradeReport {
    /// The playlist that was (or would have been) modified
    pub playlist: Playlist,
    /// One decision per track, in playlist order
    pub decisions: Vec<UpgradeDecision>,
    pub batch: UpgradeBatch,
    /// Whether the batch was written to the server
    pub committed: bool,
}

impl UpgradeReport {
    pub fn kept(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, UpgradeDecision::Kept(_)))
            .count()
    }

    pub fn replaced(&self) -> usize {
        self.batch.items_to_add.len()
    }

    pub fn omitted(&self) -> usize {
        self.batch.items_omitted.len()
    }
}

/// Receives progress while a run is in flight.
///
/// All methods default to doing nothing.
pub trait UpgradeObserver {
    /// A copy of the playlist was created and will be modified instead.
    fn playlist_created(&mut self, _playlist: &Playlist) {}

    /// `track` failed the quality check; candidates are being looked up.
    fn needs_upgrade(&mut self, _track: &Track) {}

    /// A decision was made for a track.
    fn decision(&mut self, _decision: &UpgradeDecision) {}
}

impl UpgradeObserver for () {}

/// Runs one playlist upgrade against a catalog.
pub struct PlaylistUpgrader<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    options: UpgradeOptions,
    state: UpgradeState,
}

impl<'a, C: Catalog + ?Sized> PlaylistUpgrader<'a, C> {
    pub fn new(catalog: &'a C, options: UpgradeOptions) -> Self {
        Self {
            catalog,
            options: options.effective(),
            state: UpgradeState::Initializing,
        }
    }

    /// Current state of the run.
    pub fn state(&self) -> UpgradeState {
        self.state
    }

    fn enter(&mut self, state: UpgradeState) {
        tracing::debug!(target: "upgrade", from = ?self.state, to = ?state, "State change");
        self.state = state;
    }

    /// Upgrade `playlist`.
    ///
    /// `chooser` is only consulted in manual mode. Catalog failures abort
    /// the run and are returned as-is.
    pub async fn run(
        &mut self,
        playlist: &Playlist,
        chooser: &mut dyn ReplacementChooser,
        observer: &mut dyn UpgradeObserver,
    ) -> Result<UpgradeReport> {
        self.enter(UpgradeState::Initializing);
        let mut playlist = playlist.clone();
        let mut items = self
            .catalog
            .playlist_items(&playlist)
            .await
            .with_context(format!("loading playlist '{}'", playlist.title))?;

        if self.options.duplicate && !self.options.dry_run {
            self.enter(UpgradeState::Duplicating);
            let copy = self
                .catalog
                .create_playlist(
                    &format!("Copy of {}", playlist.title),
                    &playlist.summary,
                    &items,
                    &playlist.playlist_type,
                )
                .await
                .with_context(format!("duplicating playlist '{}'", playlist.title))?;
            tracing::info!(target: "upgrade", title = %copy.title, "Created playlist copy");
            observer.playlist_created(&copy);

            items = self.catalog.playlist_items(&copy).await?;
            playlist = copy;
        }

        self.enter(UpgradeState::Scanning);
        let (decisions, batch) = self.scan(&items, chooser, observer).await?;

        let committed = if self.options.dry_run {
            false
        } else {
            self.enter(UpgradeState::Committing);
            self.commit(&playlist, &batch).await?;
            true
        };

        self.enter(UpgradeState::Reporting);
        let report = UpgradeReport {
            playlist,
            decisions,
            batch,
            committed,
        };
        tracing::info!(
            target: "upgrade",
            playlist = %report.playlist.title,
            kept = report.kept(),
            replaced = report.replaced(),
            omitted = report.omitted(),
            dry_run = self.options.dry_run,
            "Upgrade finished"
        );

        self.enter(UpgradeState::Done);
        Ok(report)
    }

    /// Classify every track without touching the playlist.
    async fn scan(
        &self,
        items: &[Track],
        chooser: &mut dyn ReplacementChooser,
        observer: &mut dyn UpgradeObserver,
    ) -> Result<(Vec<UpgradeDecision>, UpgradeBatch)> {
        let mut decisions = Vec::with_capacity(items.len());
        let mut batch = UpgradeBatch::default();

        for item in items {
            let decision = self.decide(item, chooser, observer).await?;
            tracing::info!(
                target: "upgrade",
                track = %item,
                decision = decision_kind(&decision),
                "Track classified"
            );
            observer.decision(&decision);
            batch.record(&decision);
            decisions.push(decision);
        }

        Ok((decisions, batch))
    }

    async fn decide(
        &self,
        item: &Track,
        chooser: &mut dyn ReplacementChooser,
        observer: &mut dyn UpgradeObserver,
    ) -> Result<UpgradeDecision> {
        if meets_requirements(item, self.options.requirement) {
            return Ok(UpgradeDecision::Kept(item.clone()));
        }
        observer.needs_upgrade(item);

        let raw = find_candidates(self.catalog, &item.title, item.artist()).await?;
        let ranked = rank(item, raw);
        if ranked.is_empty() {
            return Ok(UpgradeDecision::Omitted {
                track: item.clone(),
                reason: OmitReason::NoCandidates,
            });
        }

        Ok(match resolve(item, &ranked, self.options.mode, chooser) {
            Some(replacement) => UpgradeDecision::Replaced {
                original: item.clone(),
                replacement,
            },
            None => UpgradeDecision::Omitted {
                track: item.clone(),
                reason: OmitReason::NoneSelected,
            },
        })
    }

    /// Apply the batch: removals first, then additions.
    async fn commit(&self, playlist: &Playlist, batch: &UpgradeBatch) -> Result<()> {
        if !batch.has_changes() {
            tracing::info!(target: "upgrade", playlist = %playlist.title, "Nothing to commit");
            return Ok(());
        }
        if !batch.items_to_remove.is_empty() {
            self.catalog
                .remove_items(playlist, &batch.items_to_remove)
                .await
                .with_context(format!("removing tracks from '{}'", playlist.title))?;
        }
        if !batch.items_to_add.is_empty() {
            self.catalog
                .add_items(playlist, &batch.items_to_add)
                .await
                .with_context(format!("adding tracks to '{}'", playlist.title))?;
        }
        Ok(())
    }
}

fn decision_kind(decision: &UpgradeDecision) -> &'static str {
    match decision {
        UpgradeDecision::Kept(_) => "kept",
        UpgradeDecision::Replaced { .. } => "replaced",
        UpgradeDecision::Omitted { .. } => "omitted",
    }
}
