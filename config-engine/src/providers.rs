// Configuration sources, merged in the order they are added
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A YAML or TOML file that must exist
    File(PathBuf),
    /// A YAML or TOML file that is skipped when absent
    OptionalFile(PathBuf),
    /// Environment variables with this prefix; `__` separates nested keys
    Env { prefix: String },
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn optional_file(path: impl Into<PathBuf>) -> Self {
        Self::OptionalFile(path.into())
    }

    pub fn env(prefix: impl Into<String>) -> Self {
        Self::Env { prefix: prefix.into() }
    }

    pub(crate) fn merge_into(&self, figment: Figment) -> Result<Figment> {
        match self {
            Self::File(path) => {
                if !path.exists() {
                    return Err(ConfigError::SourceNotFound(path.clone()));
                }
                merge_file(figment, path)
            }
            Self::OptionalFile(path) => {
                if path.exists() {
                    merge_file(figment, path)
                } else {
                    tracing::debug!(path = %path.display(), "Optional config file absent, skipping");
                    Ok(figment)
                }
            }
            Self::Env { prefix } => Ok(figment.merge(Env::prefixed(prefix).split("__"))),
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(figment.merge(Yaml::file(path))),
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
