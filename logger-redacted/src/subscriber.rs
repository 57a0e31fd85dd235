// Global tracing subscriber setup
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggerConfig};
use crate::error::LoggerError;
use crate::redactor::{install_redactor, RedactionConfig};

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG` wins over `config.log_level`. When a log directory is configured
/// the returned guard must be held for the lifetime of the process, dropping it
/// flushes and stops the file writer.
pub fn init_tracing(config: &LoggerConfig) -> Result<Option<WorkerGuard>, LoggerError> {
    install_redactor(RedactionConfig {
        enabled: config.redaction_enabled,
        hash_for_correlation: config.hash_for_correlation,
        ..Default::default()
    });

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_directive())
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let pretty_layer = (config.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(std::io::stderr)
    });

    let json_layer = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .json()
    });

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "healthwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(writer)
                .json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}
