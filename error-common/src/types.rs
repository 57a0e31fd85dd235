use serde::Serialize;
use thiserror::Error;

use crate::codes;

/// Broad family an error belongs to.
///
/// Every failure in HealthWatch is recoverable; the kind tells the caller which
/// piece of durable state was involved so it can re-prompt or retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Storage,
    Sync,
    Auth,
    Config,
    Validation,
    Internal,
}

/// Workspace-level error used at the binary boundary
#[derive(Error, Debug)]
pub enum HealthWatchError {
    /// Device-local slot unreadable or unwritable
    #[error("Storage error: {message}")]
    Storage { code: &'static str, message: String },

    /// Remote submission failed, queue preserved
    #[error("Sync error: {message}")]
    Sync { code: &'static str, message: String },

    /// Identity verification failed, no session created
    #[error("Authentication error: {message}")]
    Auth { code: &'static str, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HealthWatchError {
    pub fn storage(code: &'static str, message: impl Into<String>) -> Self {
        Self::Storage { code, message: message.into() }
    }

    pub fn sync(code: &'static str, message: impl Into<String>) -> Self {
        Self::Sync { code, message: message.into() }
    }

    pub fn auth(code: &'static str, message: impl Into<String>) -> Self {
        Self::Auth { code, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Sync { .. } => ErrorKind::Sync,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::InternalError(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage { code, .. } | Self::Sync { code, .. } | Self::Auth { code, .. } => code,
            Self::ConfigError(_) => codes::configuration::INVALID_CONFIG,
            Self::ValidationError(_) => codes::validation::INVALID_INPUT,
            Self::InternalError(_) | Self::Other(_) => codes::internal::UNEXPECTED,
        }
    }
}

/// Result type alias for HealthWatch operations
pub type Result<T> = std::result::Result<T, HealthWatchError>;

/// Logs an error with its code and kind
pub fn log_error(context: &str, error: &HealthWatchError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error_kind = ?error.kind(),
        error = %error,
        "HealthWatch error occurred"
    );
}
