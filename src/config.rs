// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Start-up configuration: backend location, request timeout, and log filter.
//!
//! Sources, later ones winning:
//! - built-in defaults,
//! - a TOML file (`$STUDENTDESK_CONFIG`, else `<config dir>/studentdesk/config.toml` if present),
//! - the `STUDENTDESK_API_URL` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::logic::api::parse_base_url;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "STUDENTDESK_CONFIG";
/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "STUDENTDESK_API_URL";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL the `/students` collection lives under.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".into(),
            request_timeout_secs: 10,
            log_filter: "info".into(),
        }
    }
}

impl Config {
    /// Load configuration from the standard locations and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(
            std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
            default_config_path(),
            std::env::var(API_URL_ENV).ok(),
        )
    }

    /// Resolve configuration from already-gathered sources.
    ///
    /// An `explicit` path must exist; the `default` path is only read when present.
    /// `api_url` overrides whatever base URL the file set.
    pub fn load_from(
        explicit: Option<PathBuf>,
        default: Option<PathBuf>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let mut config = match (explicit, default) {
            (Some(path), _) => Self::from_file(&path)?,
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file; missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        parse_base_url(&self.api_base_url)?;
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("studentdesk").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "api_base_url = \"https://school.example/api\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.api_base_url, "https://school.example/api");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.log_filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected_with_path_in_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "base = \"x\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();

        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn validate_rejects_bad_url_and_zero_timeout() {
        let mut config = Config {
            api_base_url: "not a url".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.api_base_url = "http://localhost:5000".into();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_is_an_error_when_named_explicitly() {
        let tmp = TempDir::new().unwrap();

        let err = Config::load_from(Some(tmp.path().join("absent.toml")), None, None).unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();

        let config = Config::load_from(None, Some(tmp.path().join("config.toml")), None).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_path_wins_over_default_file() {
        let tmp = TempDir::new().unwrap();
        let explicit = write_config(&tmp, "explicit.toml", "request_timeout_secs = 3\n");
        let default = write_config(&tmp, "config.toml", "request_timeout_secs = 30\n");

        let config = Config::load_from(Some(explicit), Some(default), None).unwrap();

        assert_eq!(config.request_timeout_secs, 3);
    }

    #[test]
    fn existing_default_file_is_read() {
        let tmp = TempDir::new().unwrap();
        let default = write_config(&tmp, "config.toml", "log_filter = \"debug\"\n");

        let config = Config::load_from(None, Some(default), None).unwrap();

        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn api_url_override_replaces_file_value() {
        let tmp = TempDir::new().unwrap();
        let explicit = write_config(
            &tmp,
            "explicit.toml",
            "api_base_url = \"http://file.example/api\"\n",
        );

        let config = Config::load_from(
            Some(explicit),
            None,
            Some("https://env.example/v1".into()),
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://env.example/v1");
    }

    #[test]
    fn invalid_api_url_override_fails_validation() {
        let err = Config::load_from(None, None, Some("not a url".into())).unwrap_err();

        assert!(err.to_string().contains("Invalid backend URL"));
    }
}
