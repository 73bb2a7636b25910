//! The replacement-selection engine.
//!
//! - [`quality`] - does a track already meet the quality bar?
//! - [`finder`] - search the catalog for other copies of a track
//! - [`ranker`] - filter and order those copies
//! - [`resolver`] - pick one, automatically or by asking
//! - [`upgrader`] - run all of the above over a playlist and commit

pub mod finder;
pub mod quality;
pub mod ranker;
pub mod resolver;
pub mod upgrader;

pub use quality::{QualityRequirement, meets_requirements};
pub use resolver::{CandidateOption, NoChoice, ReplacementChooser, ResolveMode};
pub use upgrader::{
    OmitReason, PlaylistUpgrader, UpgradeBatch, UpgradeDecision, UpgradeObserver, UpgradeOptions,
    UpgradeReport, UpgradeState,
};
