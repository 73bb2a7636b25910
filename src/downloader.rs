//! Fetch tracks that could not be upgraded with spotdl.
//!
//! This module shells out to the `spotdl` command-line tool. It is run
//! after an upgrade, once per omitted track, searching for
//! `"<artist> - <title>"`. Downloaded files land in the configured output
//! directory; adding them to the library is left to the media server's
//! own scanner.
//!
//! Install spotdl: `pip install spotdl`
//! See: https://github.com/spotDL/spotify-downloader

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::DownloadConfig;
use crate::error::{Error, Result, ResultExt};
use crate::model::Track;

/// Outcome of downloading a batch of tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// spotdl runner.
pub struct SpotDl {
    executable: String,
    output_dir: PathBuf,
    extra_args: Vec<String>,
}

impl SpotDl {
    pub fn new(config: &DownloadConfig) -> Self {
        Self {
            executable: config.spotdl_path.clone(),
            output_dir: config.output_dir.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Directory downloads are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// spotdl's version string, or `None` if it cannot be run.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.executable)
            .arg("--version")
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Download every track in `tracks`, one after another.
    ///
    /// A failure for one track is logged and does not stop the rest.
    pub fn download_all(&self, tracks: &[Track]) -> Result<DownloadSummary> {
        if tracks.is_empty() {
            return Ok(DownloadSummary::default());
        }

        let version = self.version().ok_or_else(|| {
            Error::download(format!(
                "'{}' not found. Install it with: pip install spotdl",
                self.executable
            ))
        })?;
        tracing::info!(target: "downloader", %version, "Using spotdl");

        std::fs::create_dir_all(&self.output_dir)
            .with_context(format!("creating {:?}", self.output_dir))?;

        let mut summary = DownloadSummary::default();
        for track in tracks {
            let query = search_query(track);
            tracing::info!(target: "downloader", %query, "Searching");
            match self.download(&query) {
                Ok(()) => summary.succeeded.push(query),
                Err(e) => {
                    tracing::warn!(target: "downloader", %query, error = %e, "Download failed");
                    summary.failed.push(query);
                }
            }
        }
        Ok(summary)
    }

    fn download(&self, query: &str) -> Result<()> {
        let status = Command::new(&self.executable)
            .args(download_args(query, &self.extra_args))
            .current_dir(&self.output_dir)
            .status()
            .map_err(|e| Error::download(format!("Failed to run spotdl: {}", e)))?;

        if !status.success() {
            return Err(Error::download(format!("spotdl exited with {}", status)));
        }
        Ok(())
    }
}

/// `"<artist> - <title>"`
pub fn search_query(track: &Track) -> String {
    format!("{} - {}", track.artist(), track.title)
}

fn download_args(query: &str, extra_args: &[String]) -> Vec<String> {
    let mut args = vec!["download".to_string(), query.to_string()];
    args.extend(extra_args.iter().cloned());
    args
}
