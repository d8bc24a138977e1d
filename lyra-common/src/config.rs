//! Configuration loading and resolution
//!
//! Values are resolved in priority order:
//! 1. Command-line argument (highest priority, clap also folds in its `env` fallback)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GENIUS_API_BASE: &str = "https://api.genius.com";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const ENV_GENIUS_TOKEN: &str = "LYRA_GENIUS_TOKEN";
pub const ENV_GEMINI_API_KEY: &str = "LYRA_GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "LYRA_GEMINI_MODEL";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    /// Genius API access token used for lyric searches
    pub genius_token: Option<String>,
    /// Gemini API key used for analysis generation
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub spotify_api_base: Option<String>,
    pub genius_api_base: Option<String>,
    pub gemini_api_base: Option<String>,
}

impl TomlConfig {
    /// Parse a config file. A malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an explicit path, else from the platform default location.
    ///
    /// A missing file logs a warning and yields defaults; it never stops startup.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => {
                    warn!("Could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit.is_some() {
                warn!("Config file {} not found, using defaults", path.display());
            } else {
                info!("No config file at {}, using defaults", path.display());
            }
            return Ok(Self::default());
        }

        info!("Loading config from {}", path.display());
        Self::load(&path)
    }
}

/// Platform config file location: `<config_dir>/lyra/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyra").join("config.toml"))
}

/// Settings already merged from the command line and its environment fallbacks
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    pub log_level: String,
    pub genius_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub spotify_api_base: String,
    pub genius_api_base: String,
    pub gemini_api_base: String,
}

impl ServiceConfig {
    /// Merge CLI, environment and TOML values over compiled defaults
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Self {
        let genius_token = first_valid(&[env_value(ENV_GENIUS_TOKEN), toml.genius_token.clone()]);
        let gemini_api_key =
            first_valid(&[env_value(ENV_GEMINI_API_KEY), toml.gemini_api_key.clone()]);

        Self {
            bind: first_valid(&[cli.bind.clone(), toml.bind.clone()])
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: cli.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            log_level: first_valid(&[cli.log_level.clone(), toml.log_level.clone()])
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            genius_token,
            gemini_api_key,
            gemini_model: first_valid(&[env_value(ENV_GEMINI_MODEL), toml.gemini_model.clone()])
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            spotify_api_base: toml
                .spotify_api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_BASE.to_string()),
            genius_api_base: toml
                .genius_api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_GENIUS_API_BASE.to_string()),
            gemini_api_base: toml
                .gemini_api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        }
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Reject settings the server cannot start with
    ///
    /// Missing upstream credentials only warn; the affected calls degrade.
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(Error::Config("bind address is empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidInput("port must be non-zero".to_string()));
        }

        if self.genius_token.is_none() {
            warn!(
                "Genius token not configured (set {} or genius_token in config.toml); lyric searches will find nothing",
                ENV_GENIUS_TOKEN
            );
        }
        if self.gemini_api_key.is_none() {
            warn!(
                "Gemini API key not configured (set {} or gemini_api_key in config.toml); analysis will report errors",
                ENV_GEMINI_API_KEY
            );
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// First candidate that is present and not blank
fn first_valid(candidates: &[Option<String>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_valid_skips_blank() {
        let picked = first_valid(&[Some("  ".to_string()), None, Some("key".to_string())]);
        assert_eq!(picked.as_deref(), Some("key"));
        assert_eq!(first_valid(&[None, Some(String::new())]), None);
    }

    #[test]
    fn test_listen_addr() {
        let config = ServiceConfig::resolve(
            &CliOverrides {
                bind: Some("0.0.0.0".to_string()),
                port: Some(8080),
                log_level: None,
            },
            &TomlConfig::default(),
        );
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config = ServiceConfig::resolve(&CliOverrides::default(), &TomlConfig::default());
        config.port = 0;
        assert!(config.validate().is_err());
    }
}
