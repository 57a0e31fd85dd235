use error_common::{codes, HealthWatchError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded while writing slot '{key}' ({attempted} bytes)")]
    QuotaExceeded { key: String, attempted: usize },

    #[error("Slot '{key}' holds unreadable data: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Classifies a failed write, recognising SQLite's "database or disk is full"
    pub(crate) fn from_write(key: &str, attempted: usize, err: sqlx::Error) -> Self {
        let disk_full = match &err {
            sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("13"),
            _ => false,
        };
        if disk_full {
            StorageError::QuotaExceeded { key: key.to_string(), attempted }
        } else {
            StorageError::Database(err)
        }
    }

    /// A loaded slot whose bytes cannot be decoded by its owner
    pub fn corrupt(key: &str, reason: impl std::fmt::Display) -> Self {
        StorageError::Corrupt { key: key.to_string(), reason: reason.to_string() }
    }

    /// Stable code reported to the user
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::QuotaExceeded { .. } => codes::storage::QUOTA_EXCEEDED,
            StorageError::Database(_) => codes::storage::WRITE_FAILED,
            StorageError::Corrupt { .. } => codes::storage::CORRUPT_SLOT,
            StorageError::Unavailable(_) | StorageError::Io(_) => codes::storage::SLOT_UNAVAILABLE,
        }
    }
}

impl From<StorageError> for HealthWatchError {
    fn from(err: StorageError) -> Self {
        HealthWatchError::storage(err.code(), err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
