//! HealthWatch field client
//!
//! Health workers in villages with patchy coverage use this client to sign in
//! with their phone number, file disease case reports and water quality tests,
//! and push them to the district server when a connection is available.
//!
//! # Example Usage
//!
//! ```bash
//! healthwatch request-otp +911234567890
//! healthwatch login +911234567890 123456
//! healthwatch --offline report case --location "Ward 4" --symptoms fever,diarrhea --severity moderate
//! healthwatch report water --source "Hand pump 2" --ph 7.2 --turbidity 1.5
//! healthwatch queue
//! healthwatch sync
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod records;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use context::AppContext;
