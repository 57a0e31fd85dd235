// Layered configuration engine
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::providers::Serialized;
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::providers::ConfigSource;
use crate::validation::ConfigValidator;

/// Merges the type's defaults with each added source, later sources winning
#[derive(Debug, Clone, Default)]
pub struct ConfigEngine {
    sources: Vec<ConfigSource>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Builds the merged figment without extracting a type
    pub fn figment<T>(&self) -> Result<Figment>
    where
        T: Serialize + Default,
    {
        let mut figment = Figment::from(Serialized::defaults(T::default()));
        for source in &self.sources {
            figment = source.merge_into(figment)?;
        }
        Ok(figment)
    }

    /// Extracts and validates `T`
    pub fn load<T>(&self) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default + ConfigValidator,
    {
        let config: T = self.figment::<T>()?.extract()?;
        config.validate()?;
        tracing::debug!(sources = self.sources.len(), "Configuration loaded");
        Ok(config)
    }
}

/// Per-user data directory, e.g. `~/.local/share/healthwatch` on Linux
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "HealthWatch", "healthwatch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct SampleConfig {
        server_url: String,
        timeout_secs: u64,
        nested: Nested,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Nested {
        enabled: bool,
    }

    impl Default for Nested {
        fn default() -> Self {
            Self { enabled: true }
        }
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self {
                server_url: "http://localhost:8080".to_string(),
                timeout_secs: 30,
                nested: Nested::default(),
            }
        }
    }

    impl ConfigValidator for SampleConfig {
        fn validate(&self) -> Result<()> {
            if self.timeout_secs == 0 {
                return Err(ConfigError::ValidationError("timeout_secs must be positive".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_defaults_without_sources() {
        let config: SampleConfig = ConfigEngine::new().load().unwrap();
        assert_eq!(config, SampleConfig::default());
    }

    #[test]
    fn test_file_then_env_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "healthwatch.yaml",
                "server_url: https://sync.example.org\ntimeout_secs: 10\n",
            )?;
            jail.set_env("HEALTHWATCH_TIMEOUT_SECS", "5");
            jail.set_env("HEALTHWATCH_NESTED__ENABLED", "false");

            let config: SampleConfig = ConfigEngine::new()
                .add_source(ConfigSource::file("healthwatch.yaml"))
                .add_source(ConfigSource::env("HEALTHWATCH_"))
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.server_url, "https://sync.example.org");
            assert_eq!(config.timeout_secs, 5);
            assert!(!config.nested.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("healthwatch.toml", "timeout_secs = 12\n")?;
            let config: SampleConfig = ConfigEngine::new()
                .add_source(ConfigSource::file("healthwatch.toml"))
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.timeout_secs, 12);
            Ok(())
        });
    }

    #[test]
    fn test_missing_required_file() {
        let err = ConfigEngine::new()
            .add_source(ConfigSource::file("/definitely/not/here.yaml"))
            .load::<SampleConfig>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::SourceNotFound(_)));
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let config: SampleConfig = ConfigEngine::new()
            .add_source(ConfigSource::optional_file("/definitely/not/here.yaml"))
            .load()
            .unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_unsupported_extension() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("healthwatch.ini", "timeout_secs=1")?;
            let err = ConfigEngine::new()
                .add_source(ConfigSource::file("healthwatch.ini"))
                .load::<SampleConfig>()
                .unwrap_err();
            assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
            Ok(())
        });
    }

    #[test]
    fn test_validation_runs_after_merge() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HEALTHWATCH_TIMEOUT_SECS", "0");
            let err = ConfigEngine::new()
                .add_source(ConfigSource::env("HEALTHWATCH_"))
                .load::<SampleConfig>()
                .unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)));
            Ok(())
        });
    }
}
