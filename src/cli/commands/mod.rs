//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `upgrade`: Interactive and one-shot playlist upgrades
//! - `account`: Sign-in, server and playlist listings
//! - `tools`: External tool checks
//! - `session`: Shared sign-in and server connection helpers

mod account;
mod session;
mod tools;
mod upgrade;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config;

pub use account::{cmd_login, cmd_playlists, cmd_resources};
pub use tools::cmd_check_tools;
pub use upgrade::{UpgradeFlags, cmd_upgrade};

/// Replace low-quality tracks in Plex playlists with better copies from the library
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default lookup
    #[arg(long, global = true, env = "PLEX_UPGRADE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Upgrade a playlist (asks which one when --playlist is omitted)
    Upgrade {
        /// Title of the playlist to upgrade
        #[arg(short, long)]
        playlist: Option<String>,
        /// Show what would change without modifying anything
        #[arg(long)]
        dry_run: bool,
        /// Pick the best replacement automatically instead of asking
        #[arg(long)]
        simple: bool,
        /// Upgrade a copy of the playlist, leaving the original untouched
        #[arg(long)]
        duplicate: bool,
        /// Download tracks that couldn't be upgraded with spotdl
        #[arg(long)]
        download_omitted: bool,
        /// Name of the Plex Media Server to use
        #[arg(short, long)]
        resource: Option<String>,
    },
    /// List playlists that can be upgraded
    Playlists {
        /// Name of the Plex Media Server to use
        #[arg(short, long)]
        resource: Option<String>,
    },
    /// List Plex Media Servers registered to the account
    Resources,
    /// Sign in to plex.tv and print the account token
    Login,
    /// Check if spotdl is installed
    CheckTools,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config_file = cli.config.as_deref();
    let config = config::load(config_file)?;
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Upgrade {
            playlist,
            dry_run,
            simple,
            duplicate,
            download_omitted,
            resource,
        } => cmd_upgrade(
            &rt,
            &config,
            UpgradeFlags {
                playlist: playlist.as_deref(),
                dry_run: *dry_run,
                simple: *simple,
                duplicate: *duplicate,
                download_omitted: *download_omitted,
                resource: resource.as_deref(),
            },
        ),
        Commands::Playlists { resource } => cmd_playlists(&rt, &config, resource.as_deref()),
        Commands::Resources => cmd_resources(&rt, &config),
        Commands::Login => cmd_login(&rt, &config, config_file),
        Commands::CheckTools => cmd_check_tools(&config, config_file),
    }
}
