use error_common::HealthWatchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),

    #[error("Log directory unusable: {0}")]
    LogDirectory(#[from] std::io::Error),
}

impl From<LoggerError> for HealthWatchError {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::InvalidFilter(_) => HealthWatchError::ConfigError(err.to_string()),
            other => HealthWatchError::InternalError(other.to_string()),
        }
    }
}
