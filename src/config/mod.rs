use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::repositories::DEFAULT_CART_STORAGE_KEY;

/// Prefix shared by every configuration environment variable
pub const ENV_PREFIX: &str = "GOMARKETPLACE";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct CartConfig {
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

/// Where the cart is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl CartConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = CartConfig {
            storage: StorageConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Storage key cannot be empty".to_string(),
            });
        }

        if self.storage.storage_backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError {
                message: "Data directory cannot be empty for the file backend".to_string(),
            });
        }

        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Unknown log level '{}', expected one of {:?}",
                    self.observability.log_level, LOG_LEVELS
                ),
            });
        }

        Ok(())
    }
}

fn load_section<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("storage")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_backend: default_storage_backend(),
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("observability")
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            enable_json_logging: default_enable_json_logging(),
        }
    }
}

// Default value functions
pub(crate) fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from(".gomarketplace")
}

pub(crate) fn default_storage_key() -> String {
    DEFAULT_CART_STORAGE_KEY.to_string()
}

pub(crate) fn default_service_name() -> String {
    "gomarketplace-cart".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}
