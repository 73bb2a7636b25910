//! plex-upgrade - Upgrade the tracks of Plex playlists.
//!
//! Walks a playlist, finds tracks below the configured quality bar, and
//! replaces them with better copies of the same song already present in
//! the Plex library. Tracks without a better copy can optionally be
//! fetched with spotdl.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;
pub mod model;
pub mod plex;
pub mod upgrade;

use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::Directive, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let default_directive: Directive = "plex_upgrade=info".parse()?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_directive))
        .init();

    if let Err(e) = cli::run_command(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
