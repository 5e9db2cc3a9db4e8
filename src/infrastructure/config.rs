//! Configuration infrastructure
//!
//! Contains configuration loading and management for wishlist refresh runs.
//!
//! Configuration is organized into sections:
//! 1. File locations (dataset and URL list)
//! 2. HTTP transport and request pacing
//! 3. Extraction selectors and merge policy
//! 4. Logging

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use tokio::fs;
use tracing::{info, warn};

use crate::domain::services::MergePolicy;
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::pacing::PacingPolicy;
use crate::infrastructure::parsing::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dataset and URL list locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpClientConfig,

    /// Delay inserted between consecutive product requests
    #[serde(default)]
    pub pacing: PacingPolicy,

    /// How fresh results are reconciled with the previous run
    #[serde(default)]
    pub merge: MergePolicy,

    /// Selector tables and extraction limits
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// File locations used by a refresh run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Wishlist dataset, read at startup and overwritten at the end
    pub data_file: PathBuf,

    /// Optional list of URLs to track, one per line
    pub urls_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(defaults::DATA_FILE),
            urls_file: PathBuf::from(defaults::URLS_FILE),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs in the log file
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Resolve the configuration file location
    ///
    /// Order: `WISHLIST_CONFIG` env var, `wishlist_config.json` in the working
    /// directory, then the per-user config directory.
    pub fn new() -> Result<Self> {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Ok(Self::with_path(path));
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(Self::with_path(local));
        }

        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Use an explicit configuration file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { config_path: path.into() }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            if let Err(e) = self.save_config(&default_config).await {
                // Read-only locations still get a working run with defaults.
                warn!("Could not write default configuration: {:#}", e);
            }
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path).await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file is invalid: {}", parse_error);
                warn!("⚠️  Resetting to default configuration");

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config).await
                    .context("Failed to save default configuration")?;

                info!("✅ Reset to default configuration");
                Ok(default_config)
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content).await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default configuration values
pub mod defaults {
    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "wishlist-scraper";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "wishlist_config.json";

    /// Environment variable pointing at an explicit configuration file
    pub const CONFIG_ENV_VAR: &str = "WISHLIST_CONFIG";

    /// Default dataset file
    pub const DATA_FILE: &str = "data.json";

    /// Default URL list file
    pub const URLS_FILE: &str = "urls.txt";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;

    /// Redirect hops followed before giving up
    pub const MAX_REDIRECTS: usize = 10;

    /// Default delay between product requests in milliseconds
    pub const REQUEST_DELAY_MS: u64 = 3000;

    /// Chrome on Windows, the profile least likely to be challenged
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Maximum stored title length in characters
    pub const TITLE_MAX_CHARS: usize = 150;

    /// Longest string still accepted as a single price
    pub const PRICE_MAX_MATCH_CHARS: usize = 15;

    /// Currency prefix for amounts found without a symbol
    pub const CURRENCY_PREFIX: &str = "R$";

    /// Image shown when no product image could be found
    pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x400/1a1a2e/eee?text=Sem+Imagem";

    /// Title stored when no title could be found
    pub const PLACEHOLDER_TITLE: &str = "Produto sem título";

    /// Price stored when no price could be found
    pub const PLACEHOLDER_PRICE: &str = "Consultar no site";

    // Log configuration defaults
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;
}
