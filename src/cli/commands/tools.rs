//! The `check-tools` command.

use std::path::Path;

use crate::config::{self, Config};
use crate::downloader::SpotDl;

/// Report on external tools and where configuration is read from.
pub fn cmd_check_tools(config: &Config, config_file: Option<&Path>) -> anyhow::Result<()> {
    println!("Checking tools...\n");

    let spotdl = SpotDl::new(&config.download);
    if let Some(version) = spotdl.version() {
        println!("✓ spotdl: {}", version);
        println!("  Downloads go to {}", spotdl.output_dir().display());
    } else {
        println!("✗ spotdl: NOT FOUND ({})", config.download.spotdl_path);
        println!("  Install it with: pip install spotdl");
    }

    println!();
    println!("Configuration:");
    match config::config_path(config_file) {
        Some(path) if path.exists() => println!("✓ {}", path.display()),
        Some(path) => println!("✗ {} (not found, using defaults)", path.display()),
        None => println!("✗ no config directory available"),
    }

    Ok(())
}
