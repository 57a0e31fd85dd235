//! Device-local storage for HealthWatch
//!
//! Health workers file reports from villages with patchy coverage, so anything
//! not yet confirmed by the server lives in named slots on the device. Each
//! slot holds one opaque byte value; the component that owns a slot decides how
//! to encode it.
//!
//! - [`SqliteSlotStore`]: durable store in a local SQLite file
//! - [`MemorySlotStore`]: volatile store with failure switches for tests
//! - [`Slot`]: handle to one named slot, held by its single writer
//!
//! # Example
//!
//! ```rust,no_run
//! use database_layer::{keys, Slot, SqliteSlotStore, StorageConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> database_layer::StorageResult<()> {
//! let store = Arc::new(SqliteSlotStore::open(&StorageConfig::default()).await?);
//! let session = Slot::new(store, keys::SESSION);
//! session.save(br#"{"user_id":"1"}"#).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod slots;
pub mod sqlite;

pub use error::*;
pub use memory::*;
pub use slots::*;
pub use sqlite::*;
