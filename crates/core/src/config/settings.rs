use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::FetchPolicy;

/// Server used when neither the config nor the environment names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "HEROES_API_URL";

const DEFAULT_STALE_TIME_SECS: u64 = 5 * 60;

/// Where favorites are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoritesConfig {
    /// Path to the favorites database (typically relative to the workspace root).
    pub path: String,
}

impl FavoritesConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializable client configuration, stored at `.heroes/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Human-friendly workspace name.
    pub name: String,
    /// Config format version.
    pub config_version: String,
    /// Backend server, e.g. `http://localhost:3000`.
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    /// Freshness window for every cached query.
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,
    /// Keep showing the last good value when a refetch fails.
    #[serde(default)]
    pub keep_previous_on_error: bool,
    pub favorites: FavoritesConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_stale_time_secs() -> u64 {
    DEFAULT_STALE_TIME_SECS
}

impl ClientConfig {
    /// New configuration with the given name and favorites database path.
    pub fn new(name: impl Into<String>, favorites_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_version: "0.1.0".to_string(),
            api_base_url: default_api_url(),
            stale_time_secs: DEFAULT_STALE_TIME_SECS,
            keep_previous_on_error: false,
            favorites: FavoritesConfig::new(favorites_path),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Base URL after applying the `HEROES_API_URL` override.
    pub fn effective_api_url(&self) -> String {
        self.api_url_with_override(std::env::var(API_URL_ENV).ok())
    }

    fn api_url_with_override(&self, env_value: Option<String>) -> String {
        match env_value {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.api_base_url.clone(),
        }
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::new(Duration::from_secs(self.stale_time_secs))
            .keep_previous_on_error(self.keep_previous_on_error)
    }
}
