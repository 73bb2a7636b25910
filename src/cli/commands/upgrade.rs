//! The `upgrade` command.

use std::io;

use anyhow::{Context, bail};

use super::session;
use crate::catalog::{Catalog, upgradeable_playlists};
use crate::cli::prompt::{self, ConsoleObserver, LineChooser};
use crate::config::Config;
use crate::downloader::SpotDl;
use crate::model::{Playlist, Track};
use crate::upgrade::{
    NoChoice, PlaylistUpgrader, ReplacementChooser, ResolveMode, UpgradeOptions, UpgradeReport,
};

/// Flags given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeFlags<'a> {
    pub playlist: Option<&'a str>,
    pub dry_run: bool,
    pub simple: bool,
    pub duplicate: bool,
    pub download_omitted: bool,
    pub resource: Option<&'a str>,
}

/// Upgrade one playlist named on the command line, or walk the user
/// through as many as they like.
pub fn cmd_upgrade(
    rt: &tokio::runtime::Runtime,
    config: &Config,
    flags: UpgradeFlags<'_>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let server = session::connect(config, flags.resource).await?;

        match flags.playlist {
            Some(title) => {
                let playlist = find_playlist(&server, title).await?;
                let options = UpgradeOptions {
                    requirement: config.quality_requirement(),
                    mode: if flags.simple {
                        ResolveMode::Simple
                    } else {
                        ResolveMode::Manual
                    },
                    duplicate: flags.duplicate,
                    dry_run: flags.dry_run,
                };
                upgrade_playlist(&server, config, &playlist, options, flags.download_omitted).await
            }
            None if session::is_interactive() => interactive_loop(&server, config).await,
            None => bail!("--playlist is required when not running in a terminal"),
        }
    })
}

/// Look up an upgradeable playlist by exact title.
async fn find_playlist<C: Catalog + ?Sized>(catalog: &C, title: &str) -> anyhow::Result<Playlist> {
    let playlists = upgradeable_playlists(catalog).await?;
    playlists
        .into_iter()
        .find(|p| p.title == title)
        .with_context(|| format!("No upgradeable playlist titled '{}'", title))
}

async fn interactive_loop<C: Catalog + ?Sized>(catalog: &C, config: &Config) -> anyhow::Result<()> {
    loop {
        let playlists = upgradeable_playlists(catalog).await?;
        if playlists.is_empty() {
            println!("No playlists to upgrade.");
            return Ok(());
        }

        // Prompts lock stdin per question so the chooser can take it during the run.
        let ask = |question: &str, default: bool| -> io::Result<bool> {
            prompt::ask_yes_no(&mut io::stdin().lock(), &mut io::stdout(), question, default)
        };

        let Some(playlist) = prompt::choose(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Select a playlist to upgrade",
            &playlists,
            |p| p.title.clone(),
        )?
        else {
            return Ok(());
        };

        let dry_run = ask("Perform a dry run instead of modifying anything?", false)?;
        let (simple, duplicate) = if dry_run {
            (true, false)
        } else {
            (
                ask(
                    "Enable simple replacement mode (the best version available is selected automatically)?",
                    false,
                )?,
                ask("Create a duplicated playlist instead of modifying the selected one?", false)?,
            )
        };

        let options = UpgradeOptions {
            requirement: config.quality_requirement(),
            mode: if simple {
                ResolveMode::Simple
            } else {
                ResolveMode::Manual
            },
            duplicate,
            dry_run,
        };
        let report = run_once(catalog, playlist, options).await?;

        if !dry_run
            && !report.batch.items_omitted.is_empty()
            && ask(
                "Download tracks that could not be upgraded within your library with spotdl?",
                config.download.enabled,
            )?
        {
            download(config, &report.batch.items_omitted);
        }

        if !ask("Upgrade another playlist?", true)? {
            return Ok(());
        }
    }
}

async fn upgrade_playlist<C: Catalog + ?Sized>(
    catalog: &C,
    config: &Config,
    playlist: &Playlist,
    options: UpgradeOptions,
    download_omitted: bool,
) -> anyhow::Result<()> {
    let report = run_once(catalog, playlist, options).await?;
    if download_omitted && !options.dry_run {
        download(config, &report.batch.items_omitted);
    }
    Ok(())
}

async fn run_once<C: Catalog + ?Sized>(
    catalog: &C,
    playlist: &Playlist,
    options: UpgradeOptions,
) -> anyhow::Result<UpgradeReport> {
    println!();
    println!("Upgrading playlist {}...", playlist.title);

    // Without a terminal, manual mode can only leave tracks alone.
    let mut terminal;
    let mut no_choice = NoChoice;
    let chooser: &mut dyn ReplacementChooser = if session::is_interactive() {
        terminal = LineChooser::stdio();
        &mut terminal
    } else {
        &mut no_choice
    };

    let mut upgrader = PlaylistUpgrader::new(catalog, options);
    let mut observer = ConsoleObserver::new(io::stdout());
    let report = upgrader
        .run(playlist, chooser, &mut observer)
        .await
        .with_context(|| format!("upgrading playlist '{}'", playlist.title))?;

    prompt::print_summary(&mut io::stdout(), &report)?;
    Ok(report)
}

/// Hand omitted tracks to spotdl. Failures are reported, never fatal.
fn download(config: &Config, tracks: &[Track]) {
    if tracks.is_empty() {
        return;
    }
    let spotdl = SpotDl::new(&config.download);
    println!(
        "Downloading {} track(s) into {}...",
        tracks.len(),
        spotdl.output_dir().display()
    );
    match spotdl.download_all(tracks) {
        Ok(summary) => {
            println!(
                "Downloaded {} track(s), {} failed.",
                summary.succeeded.len(),
                summary.failed.len()
            );
            for query in &summary.failed {
                println!("  ✗ {}", query);
            }
        }
        Err(e) => tracing::error!(target: "downloader", error = %e, "spotdl run failed"),
    }
}
