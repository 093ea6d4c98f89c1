//! Configuration file handling.
//!
//! Reads from `~/.config/milkcrm/milkcrm.toml`

use anyhow::{Context, Result};
use milkcrm_core::rest::normalize_base_url;
use milkcrm_core::search::normalize_page_size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the CRM backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Rows per page on the list screens (5, 10 or 20).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Per-request timeout in seconds; 0 disables it.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if !is_custom {
                let config = Config::default();
                config.save_to(&config_path)?;
                tracing::info!("Created default config: {:?}", config);
                return Ok(config);
            } else {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
        }

        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.normalize();

        tracing::info!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Override the backend URL (e.g. from the command line).
    pub fn set_api_base_url(&mut self, url: &str) {
        self.api_base_url = normalize_base_url(url);
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_base_url(&self.api_base_url);
        let page_size = normalize_page_size(self.page_size);
        if page_size != self.page_size {
            tracing::warn!("Unsupported page_size {}, using {}", self.page_size, page_size);
            self.page_size = page_size;
        }
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("milkcrm").join("milkcrm.toml"))
    }
}
