//! Configuration types for linguanodon-sync

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Remote content service settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Base URL of the read-only content service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ContentConfig {
    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local store settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite database path (default: "./linguanodon.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Main configuration for the content downloader
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote content service
    #[serde(default)]
    pub content: ContentConfig,

    /// Local store
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Check settings that would otherwise fail later at first use
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.content.base_url).map_err(|e| Error::Config {
            message: format!("invalid content base URL '{}': {}", self.content.base_url, e),
            key: Some("content.base_url".to_string()),
        })?;

        if self.content.request_timeout_secs == 0 {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".to_string(),
                key: Some("content.request_timeout_secs".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://scintillating-empanada-730581.netlify.app/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("linguanodon-sync/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./linguanodon.db")
}
