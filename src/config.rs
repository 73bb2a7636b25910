//! Configuration system using TOML files.
//!
//! The config file is looked up in this order:
//! 1. The path in `$PLEX_UPGRADE_CONFIG`
//! 2. `config.toml` in the current directory
//! 3. The OS-standard config directory:
//!    - Windows: %APPDATA%\plex-upgrade\config.toml
//!    - macOS: ~/Library/Application Support/plex-upgrade/config.toml
//!    - Linux: ~/.config/plex-upgrade/config.toml
//!
//! The file is read once at startup. Values are passed explicitly into the
//! parts that need them; nothing reads configuration from global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::upgrade::QualityRequirement;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PLEX_UPGRADE_CONFIG";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// plex.tv credentials
    pub auth: AuthConfig,

    /// Quality requirement flags
    pub upgrade: UpgradeConfig,

    /// Which media server to connect to
    pub server: ServerConfig,

    /// Post-run downloader settings
    pub download: DownloadConfig,
}

/// plex.tv credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Account authentication token (preferred over username/password)
    pub server_token: Option<String>,
    pub myplex_username: Option<String>,
    pub myplex_password: Option<String>,
}

/// Quality requirement flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Treat every track as substandard
    pub force_all: bool,
    /// Only lossless codecs meet the requirement
    pub force_lossless: bool,
}

/// Media server selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name of the Plex Media Server resource to use
    pub resource: Option<String>,
    /// Direct server URL, skips resource discovery
    pub base_url: Option<String>,
}

/// spotdl settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Default answer when asked whether to download omitted tracks
    pub enabled: bool,
    /// Directory spotdl runs in
    pub output_dir: PathBuf,
    /// spotdl executable
    pub spotdl_path: String,
    /// Extra arguments appended after `download <query>`
    pub extra_args: Vec<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("spotdl"),
            spotdl_path: "spotdl".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// The quality bar for this run.
    ///
    /// `force_all` takes precedence when both flags are set.
    pub fn quality_requirement(&self) -> QualityRequirement {
        if self.upgrade.force_all {
            if self.upgrade.force_lossless {
                tracing::warn!(
                    target: "config",
                    "Both force_all and force_lossless are set; force_all wins"
                );
            }
            QualityRequirement::ForceAll
        } else if self.upgrade.force_lossless {
            QualityRequirement::ForceLossless
        } else {
            QualityRequirement::Default
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plex-upgrade"))
}

/// Resolve which config file to use.
///
/// `explicit` (from `--config`) wins over everything else.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from("config.toml");
    if local.exists() {
        return Some(local);
    }
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk.
///
/// A missing file yields the default config. A file that exists but does
/// not parse is an error.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = config_path(explicit) else {
        tracing::warn!(target: "config", "Could not determine config directory, using defaults");
        return Ok(Config::default());
    };
    load_from(&path)
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::info!(target: "config", "No config file found at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!(target: "config", "Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`, creating parent directories.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!(target: "config", "Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[auth]"));
        assert!(toml.contains("[upgrade]"));
        assert!(toml.contains("[download]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[auth]
server_token = "abc123"

[upgrade]
force_lossless = true
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.auth.server_token.as_deref(), Some("abc123"));
        assert!(config.auth.myplex_username.is_none());
        assert!(config.upgrade.force_lossless);
        assert!(!config.upgrade.force_all);
        assert_eq!(config.download.spotdl_path, "spotdl");
        assert!(config.server.base_url.is_none());
    }

    #[test]
    fn test_quality_requirement_mapping() {
        let mut config = Config::default();
        assert_eq!(config.quality_requirement(), QualityRequirement::Default);

        config.upgrade.force_lossless = true;
        assert_eq!(
            config.quality_requirement(),
            QualityRequirement::ForceLossless
        );

        config.upgrade.force_all = true;
        assert_eq!(config.quality_requirement(), QualityRequirement::ForceAll);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.auth.server_token.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[upgrade]\nforce_all = \"maybe\"\n").unwrap();

        let result = load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.auth.server_token = Some("token-xyz".to_string());
        config.server.resource = Some("Living Room".to_string());
        save(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.auth.server_token.as_deref(), Some("token-xyz"));
        assert_eq!(loaded.server.resource.as_deref(), Some("Living Room"));
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(config_path(Some(&explicit)), Some(explicit));
    }
}
