// Logger configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable, one line per event
    Pretty,
    /// Structured JSON, one object per line
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub log_level: String,
    pub format: LogFormat,
    /// Mask phone numbers and emails before they reach a log field
    pub redaction_enabled: bool,
    /// Replace redacted values with a short hash so entries stay correlatable
    pub hash_for_correlation: bool,
    /// When set, events are also written to a daily-rolling file here
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            redaction_enabled: true,
            hash_for_correlation: false,
            log_dir: None,
        }
    }
}

impl LoggerConfig {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        format!(
            "healthwatch={level},healthwatch_sync={level},auth_identity={level},database_layer={level},sqlx=warn,reqwest=info",
            level = self.log_level
        )
    }
}
