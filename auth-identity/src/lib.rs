//! Phone/OTP sign-in and the device session for HealthWatch
//!
//! This crate provides:
//! - The closed [`Role`] enumeration and the [`Session`] profile
//! - The [`IdentityProvider`] collaborator and its HTTP implementation
//! - [`SessionStore`], sole owner of the persisted `session` slot
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_identity::{HttpIdentityProvider, IdentityConfig, ProfileUpdate, SessionStore};
//! use database_layer::{SqliteSlotStore, StorageConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteSlotStore::open(&StorageConfig::default()).await?);
//! let provider = Arc::new(HttpIdentityProvider::new(IdentityConfig::default())?);
//! let sessions = SessionStore::open(store, provider).await?;
//!
//! sessions.request_otp("+911234567890").await?;
//! sessions.login("+911234567890", "123456").await?;
//! sessions.update_profile(ProfileUpdate {
//!     preferred_language: Some("hi".to_string()),
//!     ..Default::default()
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod session_store;
pub mod validation;

pub use config::IdentityConfig;
pub use error::{AuthError, Result};
pub use models::*;
pub use provider::{HttpIdentityProvider, IdentityProvider};
pub use session_store::SessionStore;
