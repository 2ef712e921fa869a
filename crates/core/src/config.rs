//! Application Configuration
//!
//! Manages the settings used while provisioning the Android toolchain:
//! - Cache directory holding downloaded tools
//! - Host platform override
//! - Network timeouts
//! - License handling

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::{DroidstrapError, Result};

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
        }
    }
}

/// Android SDK configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AndroidConfig {
    /// Answer `y` to every license prompt instead of asking the user
    pub auto_accept_licenses: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory downloaded tools are cached in (`~/.droidstrap` when unset)
    pub cache_dir: Option<PathBuf>,
    /// Host OS identifier override, e.g. `Windows`, `Darwin`, `Linux`
    pub host_os: Option<String>,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
    /// Network settings
    pub network: NetworkConfig,
    /// Android SDK settings
    pub android: AndroidConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            host_os: None,
            log_level: "info".to_string(),
            network: NetworkConfig::default(),
            android: AndroidConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "droidstrap", "droidstrap")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| DroidstrapError::Config("Cannot determine config path".into()))?;

        Self::load_from(&config_file).await
    }

    /// Load configuration from `path`, writing the defaults there if it is missing
    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig::default();
            config.save_to(path).await?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_file = Self::config_file()
            .ok_or_else(|| DroidstrapError::Config("Cannot determine config path".into()))?;

        self.save_to(&config_file).await
    }

    /// Save configuration to `path`
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Resolve the cache directory, falling back to `~/.droidstrap`
    pub fn resolve_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".droidstrap"))
                .ok_or_else(|| DroidstrapError::Config("Cannot determine home directory".into())),
        }
    }
}
