//! Command-line interface for plex-upgrade.
//!
//! This module provides the subcommands, the terminal prompts used by the
//! interactive upgrade loop, and console reporting of upgrade decisions.

mod commands;
mod prompt;

pub use commands::{Cli, Commands, run_command};
