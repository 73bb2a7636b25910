//! plex.tv account access
//!
//! Handles signing in, validating a stored token, listing the devices
//! registered to the account, and connecting to one of its servers.
//!
//! See: https://developer.plex.tv/pms/#section/API-Info/Authenticating-with-Plex

use super::{PlexServer, adapter, dto, error_for_status, http_client};
use crate::error::{Error, Result};
use crate::model::Resource;

/// plex.tv base URL
const PLEX_TV_URL: &str = "https://plex.tv";

/// An authenticated plex.tv account.
pub struct PlexAccount {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    username: Option<String>,
}

impl PlexAccount {
    /// Validate an existing account token.
    pub async fn from_token(token: impl Into<String>) -> Result<Self> {
        Self::from_token_at(PLEX_TV_URL, token).await
    }

    async fn from_token_at(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let http_client = http_client()?;
        let token = token.into();
        let url = format!("{}/api/v2/user", base_url);

        let response = http_client
            .get(&url)
            .header("X-Plex-Token", &token)
            .send()
            .await?;
        error_for_status(response.status(), &url)?;
        let user: dto::AccountUser = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        tracing::info!(target: "plex::account", username = ?user.username, "Token accepted");
        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            token: user.auth_token.unwrap_or(token),
            username: user.username,
        })
    }

    /// Sign in with username (or email) and password.
    pub async fn sign_in(username: &str, password: &str) -> Result<Self> {
        Self::sign_in_at(PLEX_TV_URL, username, password).await
    }

    async fn sign_in_at(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let http_client = http_client()?;
        let url = format!("{}/users/sign_in.json", base_url);

        let response = http_client
            .post(&url)
            .basic_auth(username, Some(password))
            .send()
            .await?;

        // plex.tv answers bad credentials with 401 and a JSON error body
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::authentication(
                "Invalid email, username, or password",
            ));
        }
        error_for_status(response.status(), &url)?;

        let body: dto::SignInResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        tracing::info!(target: "plex::account", %username, "Signed in");
        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            token: body.user.auth_token,
            username: body.user.username.or_else(|| Some(username.to_string())),
        })
    }

    /// The account's authentication token.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// All devices registered to the account.
    pub async fn resources(&self) -> Result<Vec<Resource>> {
        let url = format!("{}/api/v2/resources", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("X-Plex-Token", &self.token)
            .query(&[("includeHttps", "1"), ("includeRelay", "1")])
            .send()
            .await?;
        error_for_status(response.status(), &url)?;

        let resources: Vec<dto::ResourceDto> = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(resources.into_iter().map(adapter::to_resource).collect())
    }

    /// Media servers registered to the account.
    pub async fn media_servers(&self) -> Result<Vec<Resource>> {
        Ok(self
            .resources()
            .await?
            .into_iter()
            .filter(Resource::is_media_server)
            .collect())
    }

    /// Connect to `resource`, trying local, then remote, then relayed
    /// connections until one answers.
    pub async fn connect(&self, resource: &Resource) -> Result<PlexServer> {
        let token = resource.access_token.as_deref().unwrap_or(&self.token);
        let mut last_error = None;

        for connection in resource.ordered_connections() {
            match PlexServer::connect(&connection.uri, token).await {
                Ok(server) => return Ok(server),
                Err(e) => {
                    tracing::warn!(
                        target: "plex::account",
                        uri = %connection.uri,
                        error = %e,
                        "Connection attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::not_found(format!("connection for '{}'", resource.name)))
            .context(format!("connecting to '{}'", resource.name)))
    }
}
