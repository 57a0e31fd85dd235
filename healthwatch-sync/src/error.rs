//! Error types for the sync engine

use database_layer::StorageError;
use error_common::{codes, HealthWatchError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote submission failed: {0}")]
    Remote(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote submission timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SyncError {
    /// True when the remote side failed, as opposed to the device
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, SyncError::Remote(_) | SyncError::Network(_) | SyncError::Timeout(_))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<SyncError> for HealthWatchError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Storage(storage) => storage.into(),
            SyncError::Remote(_) => HealthWatchError::sync(codes::sync::SUBMISSION_FAILED, err.to_string()),
            SyncError::Network(_) => HealthWatchError::sync(codes::sync::NETWORK_UNREACHABLE, err.to_string()),
            SyncError::Timeout(_) => HealthWatchError::sync(codes::sync::TIMED_OUT, err.to_string()),
            SyncError::Serialization(_) => HealthWatchError::sync(codes::sync::MALFORMED_PAYLOAD, err.to_string()),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
