//! Application-wide error types.
//!
//! Library modules return [`Error`] via `thiserror`, while the CLI and
//! `main` use `anyhow` for convenient propagation.
//!
//! # Fatal vs. soft outcomes
//!
//! - [`Error::Authentication`] and [`Error::CatalogQuery`] (plus the
//!   transport-level [`Error::Network`] / [`Error::Parse`]) abort a run.
//! - "No candidate found" and "invalid manual selection" are NOT errors;
//!   they become [`crate::upgrade::UpgradeDecision::Omitted`].

use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials or token rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server answered a search or mutation with a failure
    #[error("Catalog request failed: {0}")]
    CatalogQuery(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The server's response could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// External downloader failure
    #[error("Download error: {0}")]
    Download(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a catalog query error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogQuery(message.into())
    }

    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a download error.
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is an auth rejection.
    pub fn is_authentication(&self) -> bool {
        match self {
            Self::Authentication(_) => true,
            Self::WithContext { source, .. } => source.is_authentication(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("playlist 'Favorites'");
        assert!(err.to_string().contains("Favorites"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::catalog("HTTP 500").context("while removing tracks");
        let msg = err.to_string();
        assert!(msg.contains("while removing tracks"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn test_is_authentication_sees_through_context() {
        let err = Error::authentication("invalid token").context("signing in");
        assert!(err.is_authentication());
        assert!(!Error::catalog("boom").is_authentication());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::download("spotdl missing"));
        let with_ctx = result.with_context("post-run download");
        assert!(
            with_ctx
                .unwrap_err()
                .to_string()
                .contains("post-run download")
        );
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk full"));
        let err = result.with_context("writing config").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
    }
}
