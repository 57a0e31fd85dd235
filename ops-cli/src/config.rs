//! Application configuration
//!
//! Defaults, then `healthwatch.yaml` (or the file given with `--config`), then
//! `HEALTHWATCH_*` environment variables. Nested keys use `__`, for example
//! `HEALTHWATCH_REMOTE__SERVER_URL`.

use auth_identity::IdentityConfig;
use config_engine::{default_data_dir, ConfigEngine, ConfigError, ConfigSource, ConfigValidator};
use database_layer::StorageConfig;
use healthwatch_sync::{QueueConfig, RemoteConfig};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "healthwatch.yaml";
pub const ENV_PREFIX: &str = "HEALTHWATCH_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Connectivity reported at startup when `--offline` is not given
    pub assume_online: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { assume_online: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub queue: QueueConfig,
    pub remote: RemoteConfig,
    pub identity: IdentityConfig,
    pub logging: LoggerConfig,
    pub network: NetworkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let db_path = default_data_dir()
            .map(|dir| dir.join("healthwatch.db"))
            .unwrap_or_else(|_| PathBuf::from("healthwatch.db"));

        Self {
            storage: StorageConfig {
                db_path,
                ..Default::default()
            },
            queue: QueueConfig::default(),
            remote: RemoteConfig::default(),
            identity: IdentityConfig::default(),
            logging: LoggerConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> config_engine::Result<()> {
        if self.queue.submit_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "queue.submit_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "storage.max_connections must be greater than 0".to_string(),
            ));
        }

        check_url("remote.server_url", &self.remote.server_url)?;
        check_url("identity.base_url", &self.identity.base_url)?;

        Ok(())
    }
}

fn check_url(field: &str, url: &str) -> config_engine::Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            field, url
        )))
    }
}

impl AppConfig {
    /// An explicit path must exist; the default file is optional
    pub fn load(path: Option<&Path>) -> config_engine::Result<Self> {
        let file = match path {
            Some(path) => ConfigSource::file(path),
            None => ConfigSource::optional_file(DEFAULT_CONFIG_FILE),
        };

        ConfigEngine::new()
            .add_source(file)
            .add_source(ConfigSource::env(ENV_PREFIX))
            .load()
    }
}
