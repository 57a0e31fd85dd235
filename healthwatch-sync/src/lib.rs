//! Offline-first synchronization for HealthWatch
//!
//! Provides:
//! - Connectivity monitor mirroring the host's online/offline signal
//! - Durable mutation queue written through to the device slot store
//! - All-or-nothing batch flush with a single-flight guard
//! - HTTP submitter for the server's sync endpoint
//!
//! Items never reorder, never duplicate, and are never dropped on failure.
//! Retry policy belongs to the caller: a failed flush simply leaves the queue
//! as it was for the next attempt.

pub mod connectivity;
pub mod error;
pub mod queue;
pub mod remote;

pub use connectivity::ConnectivityMonitor;
pub use error::{SyncError, SyncResult};
pub use queue::{FlushOutcome, QueueConfig, QueueItem, SyncQueueManager, SyncStatus};
pub use remote::{HttpSubmitter, RemoteConfig, RemoteSubmitter};
