//! Configuration file parsing for .stackboost.toml

use crate::license::client::DEFAULT_API_URL;
use crate::license::types::{LicensePolicy, CACHE_TTL, GRACE_PERIOD, REQUEST_TIMEOUT};
use crate::store::FileStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = ".stackboost.toml";

const SECS_PER_HOUR: u64 = 60 * 60;

/// Main configuration structure for .stackboost.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackboostConfig {
    #[serde(default)]
    pub license: LicenseConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Base URL of the licensing API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long a successful validation is cached
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// How long transient API failures keep the last known tier
    #[serde(default = "default_grace_period_hours")]
    pub grace_period_hours: u64,

    /// Label sent on activation (defaults to the host name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Settings file (defaults to ~/.config/stackboost/store.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

fn default_cache_ttl_hours() -> u64 {
    CACHE_TTL.as_secs() / SECS_PER_HOUR
}

fn default_grace_period_hours() -> u64 {
    GRACE_PERIOD.as_secs() / SECS_PER_HOUR
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            grace_period_hours: default_grace_period_hours(),
            instance_name: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LicenseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn policy(&self) -> LicensePolicy {
        LicensePolicy {
            cache_ttl: Duration::from_secs(self.cache_ttl_hours.saturating_mul(SECS_PER_HOUR)),
            grace_period: Duration::from_secs(self.grace_period_hours.saturating_mul(SECS_PER_HOUR)),
        }
    }

    /// Configured instance name, else the host name, else "stackboost-site".
    pub fn instance_name(&self) -> String {
        if let Some(name) = self.instance_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| "stackboost-site".to_string())
    }
}

impl StoreConfig {
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(FileStore::default_path)
    }
}

impl StackboostConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StackboostConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load .stackboost.toml from the current directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
