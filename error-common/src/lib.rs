//! Common error handling utilities for HealthWatch
//!
//! Every crate in the workspace owns a `thiserror` enum for its own failures
//! (`StorageError`, `SyncError`, `AuthError`, `ConfigError`) and converts it into
//! [`HealthWatchError`] at the binary boundary. The conversion attaches a stable
//! error code from [`codes`] and an [`ErrorKind`] so the presentation layer can
//! tell the three recoverable families apart:
//!
//! - **Storage**: the device-local slot could not be read or written
//! - **Sync**: the remote submission failed and the queue was preserved
//! - **Auth**: identity verification failed and no session was created
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, ErrorKind, HealthWatchError};
//!
//! let err = HealthWatchError::auth(codes::authentication::INVALID_CREDENTIALS, "OTP rejected");
//! assert_eq!(err.kind(), ErrorKind::Auth);
//! assert_eq!(err.code(), "AUTH_3001");
//! ```

pub mod types;
pub mod codes;

pub use types::*;
