// Slot abstraction shared by every device-local store
use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StorageResult;

/// Well-known slot names
pub mod keys {
    /// Serialized ordered array of queue items
    pub const SYNC_QUEUE: &str = "sync_queue";
    /// Serialized session, absent when logged out
    pub const SESSION: &str = "session";
}

/// Device-local key-value storage.
///
/// A successful `save` is durable when it returns; a failed `save` leaves the
/// previous value in place.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    async fn save(&self, key: &str, value: &[u8]) -> StorageResult<()>;
    async fn clear(&self, key: &str) -> StorageResult<()>;
}

/// Handle to a single named slot, held by the component that owns it
#[derive(Clone)]
pub struct Slot {
    store: Arc<dyn SlotStore>,
    key: &'static str,
}

impl Slot {
    pub fn new(store: Arc<dyn SlotStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        self.store.load(self.key).await
    }

    pub async fn save(&self, value: &[u8]) -> StorageResult<()> {
        self.store.save(self.key, value).await
    }

    pub async fn clear(&self) -> StorageResult<()> {
        self.store.clear(self.key).await
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("key", &self.key).finish_non_exhaustive()
    }
}
