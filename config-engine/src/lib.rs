//! Layered configuration for HealthWatch
//!
//! Configuration is merged from, in increasing precedence:
//! - the type's `Default` implementation
//! - YAML or TOML files
//! - environment variables with a prefix (`__` separates nested keys)
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::{ConfigEngine, ConfigSource, ConfigValidator};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct AppConfig {
//!     server_url: String,
//! }
//!
//! impl ConfigValidator for AppConfig {
//!     fn validate(&self) -> config_engine::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let config: AppConfig = ConfigEngine::new()
//!     .add_source(ConfigSource::optional_file("healthwatch.yaml"))
//!     .add_source(ConfigSource::env("HEALTHWATCH_"))
//!     .load()?;
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod engine;
pub mod providers;
pub mod validation;
pub mod error;

pub use engine::*;
pub use providers::*;
pub use validation::*;
pub use error::*;
