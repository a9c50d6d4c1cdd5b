//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use pmovies_api::omdb::{DEFAULT_DATA_SUB_HOST, DEFAULT_HOST, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
}

/// OMDb connection configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OmdbConfig {
    /// Access key sent as `apikey`. `OMDB_API_KEY` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OMDb host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Sub-host serving the data endpoint.
    #[serde(default = "default_data_sub_host")]
    pub data_sub_host: String,
    /// Full data endpoint URL; overrides `host` and `data_sub_host`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bound on a single request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    String::from(DEFAULT_HOST)
}

fn default_data_sub_host() -> String {
    String::from(DEFAULT_DATA_SUB_HOST)
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: default_host(),
            data_sub_host: default_data_sub_host(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OmdbConfig {
    /// Request bound as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
