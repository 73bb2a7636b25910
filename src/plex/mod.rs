//! Plex integration: plex.tv account access and the media server catalog.
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - exact JSON shapes returned by Plex
//! - **Adapter** (`adapter.rs`) - the only place DTOs become domain models
//! - **Account** (`account.rs`) - plex.tv sign-in and resource discovery
//! - **Client** (`client.rs`) - a connected Plex Media Server, implementing
//!   [`crate::catalog::Catalog`]
//!
//! All requests ask for JSON (`Accept: application/json`); Plex answers
//! with XML otherwise.
//!
//! API docs: https://developer.plex.tv/pms/

mod account;
mod adapter;
mod client;
pub mod dto;

pub use account::PlexAccount;
pub use client::PlexServer;

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// Product name sent to Plex
pub const PRODUCT: &str = "plex-upgrade";

/// Identifies this installation to plex.tv
pub const CLIENT_IDENTIFIER: &str = "plex-upgrade-cli";

/// Per-request timeout for server calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client with the headers every Plex request carries.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-plex-product"),
        HeaderValue::from_static(PRODUCT),
    );
    headers.insert(
        HeaderName::from_static("x-plex-version"),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers.insert(
        HeaderName::from_static("x-plex-client-identifier"),
        HeaderValue::from_static(CLIENT_IDENTIFIER),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .gzip(true)
        .build()
        .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success HTTP status onto our error taxonomy.
pub(crate) fn error_for_status(status: reqwest::StatusCode, url: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let reason = status.canonical_reason().unwrap_or("Unknown");
    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            Error::authentication(format!("HTTP {} {} for {}", status.as_u16(), reason, url))
        }
        reqwest::StatusCode::NOT_FOUND => Error::not_found(url.to_string()),
        _ => Error::catalog(format!("HTTP {}: {} ({})", status.as_u16(), reason, url)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(error_for_status(StatusCode::OK, "/").is_ok());
        assert!(error_for_status(StatusCode::NO_CONTENT, "/").is_ok());
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, "/"),
            Err(Error::Authentication(_))
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "/"),
            Err(Error::Authentication(_))
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "/playlists/9"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "/"),
            Err(Error::CatalogQuery(_))
        ));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }
}
