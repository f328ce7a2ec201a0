//! TOML-based application configuration.
//!
//! Stores Google OAuth client credentials and sync tuning at
//! `~/.config/verve/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Google OAuth client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

/// Sync tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/verve/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_redirect_port() -> u16 {
    19823
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_port: default_redirect_port(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a value by dotted key (`google.client_id`, ...), as the CLI
    /// config commands address it.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "google.client_id" => Some(self.google.client_id.clone()),
            "google.client_secret" => Some(self.google.client_secret.clone()),
            "google.redirect_port" => Some(self.google.redirect_port.to_string()),
            "sync.request_timeout_secs" => Some(self.sync.request_timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Set a value by dotted key. The caller persists with [`Config::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "google.client_id" => self.google.client_id = value.to_string(),
            "google.client_secret" => self.google.client_secret = value.to_string(),
            "google.redirect_port" => {
                self.google.redirect_port = parse_value(key, value)?;
            }
            "sync.request_timeout_secs" => {
                self.sync.request_timeout_secs = parse_value(key, value)?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Write the configuration back to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.google.client_id.is_empty());
        assert_eq!(config.google.redirect_port, 19823);
        assert_eq!(config.sync.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [google]
            client_id = "abc.apps.googleusercontent.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.google.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(config.google.redirect_port, 19823);
        assert_eq!(config.sync.request_timeout_secs, 30);
    }

    #[test]
    fn test_get_and_set_by_dotted_key() {
        let mut config = Config::default();
        config.set("google.client_id", "abc").unwrap();
        config.set("google.redirect_port", "9999").unwrap();
        config.set("sync.request_timeout_secs", "5").unwrap();

        assert_eq!(config.get("google.client_id").as_deref(), Some("abc"));
        assert_eq!(config.get("google.redirect_port").as_deref(), Some("9999"));
        assert_eq!(config.sync.request_timeout_secs, 5);
    }

    #[test]
    fn test_set_unknown_key_rejected() {
        let mut config = Config::default();
        let result = config.set("google.refresh_token", "x");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
        assert_eq!(config.get("google.refresh_token"), None);
    }

    #[test]
    fn test_set_unparseable_value_rejected() {
        let mut config = Config::default();
        let result = config.set("google.redirect_port", "not-a-port");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        // Failed set leaves the previous value in place.
        assert_eq!(config.google.redirect_port, 19823);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.google.client_id = "id".to_string();
        config.sync.request_timeout_secs = 10;
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.google.client_id, "id");
        assert_eq!(back.sync.request_timeout_secs, 10);
    }
}
