//! Logging for HealthWatch with phone-number redaction
//!
//! Community health workers sign in with their mobile number, and every record
//! they file is linked to it. This crate installs the process-wide `tracing`
//! subscriber and provides a [`PiiRedactor`] so those numbers never reach a log
//! line in clear text.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{redact_phone, PiiRedactor, RedactionConfig};
//!
//! tracing::info!(phone = %redact_phone("+911234567890"), "OTP requested");
//!
//! let redactor = PiiRedactor::new(RedactionConfig::default());
//! assert_eq!(redactor.redact("call 9876543210"), "call 98****3210");
//! ```

pub mod config;
pub mod error;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use subscriber::*;
