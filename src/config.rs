// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::cache::DEFAULT_TTL;
use crate::context::AppContext;
use crate::source::sheets::DEFAULT_BASE_URL;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_max_display_items() -> usize {
    10
}

fn default_timezone() -> String {
    "Asia/Ho_Chi_Minh".to_string()
}

fn default_tab() -> String {
    "Sheet1".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Where the rows come from.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// JSON export on disk: a bare array of rows or a values-API response.
    File { path: PathBuf },
    /// Google Sheets values API.
    Sheets {
        sheet_id: String,
        #[serde(default = "default_tab")]
        tab: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        access_token: Option<String>,
        #[serde(default = "default_base_url")]
        base_url: String,
    },
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Seconds fetched rows stay fresh. 0 disables caching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Items listed per report section before "... and N more".
    #[serde(default = "default_max_display_items")]
    pub max_display_items: usize,
    /// IANA zone that decides what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Caller ids allowed to request reports. Empty means anyone.
    #[serde(default)]
    pub allowed_callers: Vec<i64>,
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            max_display_items: default_max_display_items(),
            timezone: default_timezone(),
            allowed_callers: Vec::new(),
            source: None,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can point at `init`.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        // Fail early on a bad zone rather than on the first report.
        config.tz()?;
        Ok(config)
    }

    /// Detects whether an error from [`Config::load`] means the file was missing,
    /// either by our own message or an IO NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", self.timezone, e))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
