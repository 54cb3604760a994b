//! Configuration loading and token resolution for the backdesk tools.
//!
//! Profiles live in `backdesk.toml` under the platform config directory;
//! `BACKDESK_*` environment variables overlay file values via figment.
//! API tokens resolve from the environment first, then the OS keyring --
//! they are never stored in the config file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_QUALIFIER: &str = "io";
const APP_ORG: &str = "backdesk";
const APP_NAME: &str = "backdesk";

const KEYRING_SERVICE: &str = "backdesk";
const TOKEN_ENV: &str = "BACKDESK_TOKEN";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file error: {message}")]
    Io { message: String },

    #[error("Unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error(
        "No API token for profile '{profile}': set BACKDESK_TOKEN or store one with 'backdesk config set-token'"
    )]
    MissingToken { profile: String },

    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },
}

/// One named backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Backend base URL, e.g. `https://crm.example.com`.
    pub server: String,
    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: Option<bool>,
    /// Custom CA certificate (PEM).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    /// Default rows per page for list views.
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Cross-profile defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// The `backdesk.toml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

/// Platform path of `backdesk.toml`.
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("backdesk.toml"))
}

/// Platform path of the device-local UI settings file (table layouts,
/// sort specs, page sizes).
pub fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().join("settings.json"))
}

/// Platform directory for TUI log files.
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().join("logs"))
}

/// Load config from the given path (or the platform default), overlaid
/// with `BACKDESK_*` environment variables. A missing file yields the
/// default config rather than an error.
pub fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if let Some(path) = path.or_else(config_path) {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed("BACKDESK_").split("__"))
        .extract()
        .map_err(|e| ConfigError::Load(Box::new(e)))
}

/// Write the config document back to disk.
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<(), ConfigError> {
    let path = path.or_else(config_path).ok_or_else(|| ConfigError::Io {
        message: "no config directory on this platform".into(),
    })?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io {
            message: e.to_string(),
        })?;
    }
    let raw = toml::to_string_pretty(config).map_err(|e| ConfigError::Io {
        message: e.to_string(),
    })?;
    std::fs::write(&path, raw).map_err(|e| ConfigError::Io {
        message: e.to_string(),
    })
}

// ── Token resolution ─────────────────────────────────────────────────

/// Resolve the API token for a profile: environment first, then the
/// OS keyring entry `backdesk/{profile}`.
pub fn resolve_token(profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            return Ok(SecretString::from(token));
        }
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    match entry.get_password() {
        Ok(token) => Ok(SecretString::from(token)),
        Err(keyring::Error::NoEntry) => Err(ConfigError::MissingToken {
            profile: profile_name.into(),
        }),
        Err(e) => Err(ConfigError::Keyring(e.to_string())),
    }
}

/// Store an API token in the OS keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    entry
        .set_password(token)
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("nope.toml"))).unwrap();
        assert!(config.profiles.is_empty());
        assert!(config.default_profile.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdesk.toml");

        let mut config = Config::default();
        config.default_profile = Some("prod".into());
        config.profiles.insert(
            "prod".into(),
            Profile {
                server: "https://crm.example.com".into(),
                insecure: None,
                ca_cert: None,
                per_page: Some(50),
            },
        );
        save_config(&config, Some(path.clone())).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("prod"));
        assert_eq!(loaded.profile("prod").unwrap().per_page, Some(50));
        assert!(loaded.profile("staging").is_err());
    }
}
