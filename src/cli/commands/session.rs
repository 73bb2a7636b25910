//! Signing in to plex.tv and connecting to a media server.

use std::io::{self, IsTerminal};

use anyhow::{Context, bail};

use crate::cli::prompt;
use crate::config::Config;
use crate::error::Error;
use crate::model::Resource;
use crate::plex::{PlexAccount, PlexServer};

/// Whether the process can ask the user questions.
pub(crate) fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Authenticate with plex.tv.
///
/// Tries the stored token, then stored credentials, then (on a terminal)
/// asks for credentials until they are accepted. Each failure is reported
/// before moving on.
pub(crate) async fn sign_in(config: &Config) -> anyhow::Result<PlexAccount> {
    sign_in_with(config, is_interactive()).await
}

async fn sign_in_with(config: &Config, interactive: bool) -> anyhow::Result<PlexAccount> {
    let auth = &config.auth;

    if let Some(token) = auth.server_token.as_deref().filter(|t| !t.is_empty()) {
        match PlexAccount::from_token(token).await {
            Ok(account) => return Ok(account),
            Err(e) => eprintln!("Stored token was rejected: {}", e),
        }
    }

    if let (Some(username), Some(password)) = (&auth.myplex_username, &auth.myplex_password) {
        match PlexAccount::sign_in(username, password).await {
            Ok(account) => {
                print_token(&account, username);
                return Ok(account);
            }
            Err(e) => eprintln!("Sign-in with stored credentials failed: {}", e),
        }
    }

    if !interactive {
        return Err(Error::authentication(
            "no valid Plex credentials configured and no terminal to ask for them",
        )
        .into());
    }

    loop {
        let (username, password) = prompt::ask_credentials()?;
        match PlexAccount::sign_in(&username, &password).await {
            Ok(account) => {
                print_token(&account, &username);
                return Ok(account);
            }
            Err(e) if e.is_authentication() => {
                tracing::warn!(target: "plex::account", %username, "Sign-in rejected");
                eprintln!("{}", e);
            }
            Err(e) => return Err(e).context("signing in to plex.tv"),
        }
    }
}

/// Show a freshly obtained token so it can be stored in the config.
fn print_token(account: &PlexAccount, username: &str) {
    println!("Signed in as {}.", username);
    println!("Token: {}", account.token());
    println!("Add it to the [auth] section of your config as server_token.");
}

/// Pick the media server to use from the account's resources.
fn select_resource<'a>(
    servers: &'a [Resource],
    wanted: Option<&str>,
) -> anyhow::Result<&'a Resource> {
    if let Some(name) = wanted {
        return servers.iter().find(|r| r.name == name).with_context(|| {
            let names: Vec<&str> = servers.iter().map(|r| r.name.as_str()).collect();
            format!(
                "No Plex Media Server named '{}' (available: {})",
                name,
                names.join(", ")
            )
        });
    }

    match servers {
        [] => bail!("No Plex Media Server is registered to this account"),
        [only] => Ok(only),
        _ if is_interactive() => {
            let stdin = io::stdin();
            prompt::choose(
                &mut stdin.lock(),
                &mut io::stdout(),
                "Select resource to connect to",
                servers,
                |r| r.name.clone(),
            )?
            .context("No resource selected")
        }
        _ => bail!("Several Plex Media Servers found; choose one with --resource"),
    }
}

/// Connect to the media server described by `config`.
///
/// `resource` overrides the configured resource name.
pub(crate) async fn connect(config: &Config, resource: Option<&str>) -> anyhow::Result<PlexServer> {
    // A direct URL plus a token needs no plex.tv round trip.
    let token = config.auth.server_token.as_deref().filter(|t| !t.is_empty());
    if let (Some(base_url), Some(token)) = (&config.server.base_url, token) {
        if let Ok(server) = PlexServer::connect(base_url.as_str(), token).await {
            return Ok(server);
        }
        tracing::info!(target: "plex::client", %base_url, "Direct connection failed, signing in");
    }

    let account = sign_in(config).await?;

    if let Some(base_url) = &config.server.base_url {
        return PlexServer::connect(base_url.as_str(), account.token())
            .await
            .with_context(|| format!("connecting to {}", base_url));
    }

    let servers = account.media_servers().await?;
    let wanted = resource.or(config.server.resource.as_deref());
    let chosen = select_resource(&servers, wanted)?;
    println!("Connecting to {}...", chosen.name);
    Ok(account.connect(chosen).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MEDIA_SERVER_PRODUCT;

    fn server(name: &str) -> Resource {
        Resource {
            name: name.to_string(),
            product: MEDIA_SERVER_PRODUCT.to_string(),
            access_token: None,
            connections: vec![],
        }
    }

    #[tokio::test]
    async fn test_no_credentials_without_terminal_is_authentication_error() {
        let err = sign_in_with(&Config::default(), false).await.err().unwrap();
        let err = err.downcast_ref::<Error>().unwrap();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_select_by_name() {
        let servers = vec![server("Living Room"), server("Attic")];
        let chosen = select_resource(&servers, Some("Attic")).unwrap();
        assert_eq!(chosen.name, "Attic");
    }

    #[test]
    fn test_select_unknown_name_lists_available() {
        let servers = vec![server("Living Room"), server("Attic")];
        let err = select_resource(&servers, Some("Cellar")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Cellar"));
        assert!(message.contains("Living Room, Attic"));
    }

    #[test]
    fn test_select_only_server() {
        let servers = vec![server("Attic")];
        assert_eq!(select_resource(&servers, None).unwrap().name, "Attic");
    }

    #[test]
    fn test_select_from_nothing() {
        assert!(select_resource(&[], None).is_err());
    }
}
