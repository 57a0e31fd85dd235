use database_layer::StorageError;
use error_common::{codes, HealthWatchError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid phone number format")]
    InvalidPhone,

    #[error("OTP must be 6 digits")]
    InvalidOtp,

    #[error("Identity provider rejected the credentials")]
    Rejected,

    #[error("No active session")]
    NotAuthenticated,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Serialization(err.to_string())
    }
}

impl AuthError {
    /// Stable code reported to the user
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidPhone | AuthError::InvalidOtp => codes::authentication::INVALID_INPUT,
            AuthError::Rejected => codes::authentication::INVALID_CREDENTIALS,
            AuthError::NotAuthenticated => codes::authentication::SESSION_MISSING,
            AuthError::Provider(_) => codes::authentication::PROVIDER_UNAVAILABLE,
            AuthError::Storage(storage) => storage.code(),
            AuthError::Serialization(_) => codes::internal::UNEXPECTED,
        }
    }
}

impl From<AuthError> for HealthWatchError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Storage(storage) => storage.into(),
            AuthError::Serialization(_) => HealthWatchError::InternalError(err.to_string()),
            other => HealthWatchError::auth(other.code(), other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::ErrorKind;

    #[test]
    fn test_codes() {
        let err: HealthWatchError = AuthError::Rejected.into();
        assert_eq!(err.code(), codes::authentication::INVALID_CREDENTIALS);

        let err: HealthWatchError = AuthError::NotAuthenticated.into();
        assert_eq!(err.code(), codes::authentication::SESSION_MISSING);
    }

    #[test]
    fn test_storage_errors_keep_storage_code() {
        let err: HealthWatchError =
            AuthError::Storage(StorageError::Unavailable("gone".to_string())).into();
        assert_eq!(err.code(), codes::storage::SLOT_UNAVAILABLE);
    }

    #[test]
    fn test_kind_and_code_agree() {
        let corrupt = AuthError::Storage(StorageError::corrupt("session", "expected value"));
        assert_eq!(corrupt.code(), codes::storage::CORRUPT_SLOT);
        let err: HealthWatchError = corrupt.into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.code(), codes::storage::CORRUPT_SLOT);

        let err: HealthWatchError = AuthError::Serialization("bad".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), codes::internal::UNEXPECTED);
    }
}
