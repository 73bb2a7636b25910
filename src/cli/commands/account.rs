//! Account and server inspection commands: `login`, `resources`, `playlists`.

use std::io;
use std::path::Path;

use tokio::runtime::Runtime;

use super::session;
use crate::catalog::upgradeable_playlists;
use crate::cli::prompt;
use crate::config::{self, Config};

/// Sign in and show the account token, offering to store it.
pub fn cmd_login(rt: &Runtime, config: &Config, config_file: Option<&Path>) -> anyhow::Result<()> {
    let account = rt.block_on(session::sign_in(config))?;

    println!();
    println!(
        "Signed in as {}.",
        account.username().unwrap_or("(unknown user)")
    );
    println!("Token: {}", account.token());

    if config.auth.server_token.as_deref() == Some(account.token()) || !session::is_interactive() {
        return Ok(());
    }

    let Some(path) = config::config_path(config_file) else {
        println!("No config location available; add the token to your config manually.");
        return Ok(());
    };
    let question = format!("Save the token to {}?", path.display());
    if prompt::ask_yes_no(&mut io::stdin().lock(), &mut io::stdout(), &question, false)? {
        let mut updated = config.clone();
        updated.auth.server_token = Some(account.token().to_string());
        config::save(&updated, &path)?;
        println!("Saved.");
    }
    Ok(())
}

/// List the media servers registered to the account.
pub fn cmd_resources(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let account = session::sign_in(config).await?;
        let servers = account.media_servers().await?;

        if servers.is_empty() {
            println!("No Plex Media Server is registered to this account.");
            return Ok(());
        }

        println!("Plex Media Servers:");
        for server in &servers {
            println!("  {}", server.name);
            for connection in server.ordered_connections() {
                let kind = if connection.relay {
                    "relay"
                } else if connection.local {
                    "local"
                } else {
                    "remote"
                };
                println!("    {:<6} {}", kind, connection.uri);
            }
        }
        Ok(())
    })
}

/// List playlists that can be upgraded.
pub fn cmd_playlists(rt: &Runtime, config: &Config, resource: Option<&str>) -> anyhow::Result<()> {
    rt.block_on(async {
        let server = session::connect(config, resource).await?;
        let playlists = upgradeable_playlists(&server).await?;

        if playlists.is_empty() {
            println!("No upgradeable playlists.");
            return Ok(());
        }

        for playlist in &playlists {
            println!("{} ({} tracks)", playlist.title, playlist.item_count);
        }
        println!();
        println!("{} playlist(s)", playlists.len());
        Ok(())
    })
}
