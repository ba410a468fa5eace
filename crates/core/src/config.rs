//! Configuration management
//!
//! Configuration is read from a TOML file. The default location is
//! `<config dir>/lakegate/config.toml`, overridable with the
//! `LAKEGATE_CONFIG_DIR` environment variable. A missing file yields the
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "LAKEGATE_CONFIG_DIR";

/// Largest page a listing may return
pub const LIST_OBJECTS_MAX_KEYS: usize = 1000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8000".to_string()
}

/// Listing behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size used when `max-keys` is absent or invalid, and the upper
    /// bound for any requested page size
    #[serde(default = "default_max_keys")]
    pub max_keys: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_keys: default_max_keys(),
        }
    }
}

fn default_max_keys() -> usize {
    LIST_OBJECTS_MAX_KEYS
}

/// Catalog backend settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML seed file for the in-memory catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<PathBuf>,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry policy applied to catalog calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    10000
}

impl Config {
    /// Check values that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.listing.max_keys == 0 {
            return Err(Error::Config("listing.max_keys must be positive".into()));
        }
        if self.catalog.retry.max_attempts == 0 {
            return Err(Error::Config(
                "catalog.retry.max_attempts must be positive".into(),
            ));
        }
        self.server
            .listen
            .parse::<std::net::SocketAddr>()
            .map_err(|e| Error::Config(format!("server.listen '{}': {e}", self.server.listen)))?;
        Ok(())
    }
}

/// Locates, loads and saves the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use the default configuration location
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("cannot determine config directory".into()))?
                .join("lakegate"),
        };
        Ok(Self::with_path(dir.join("config.toml")))
    }

    /// Use an explicit configuration file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, falling back to defaults if the file is absent
    ///
    /// A relative seed path is resolved against the configuration file's
    /// directory.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut config: Config = toml::from_str(&content)?;

        if let Some(seed) = &config.catalog.seed
            && seed.is_relative()
            && let Some(dir) = self.path.parent()
        {
            config.catalog.seed = Some(dir.join(seed));
        }

        config.validate()?;
        Ok(config)
    }
}
