//! In-memory slot store for development/testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::slots::SlotStore;

/// Volatile slot store with switches to simulate a full or unreachable device
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RwLock<HashMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
    stalled: AtomicBool,
    /// Largest value accepted by `save`, 0 means unlimited
    capacity: AtomicUsize,
    writes: AtomicUsize,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any value larger than `bytes`
    pub fn with_capacity_limit(self, bytes: usize) -> Self {
        self.capacity.store(bytes, Ordering::SeqCst);
        self
    }

    /// Makes every subsequent call fail with `StorageError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes every subsequent save and clear hang until the caller gives up
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    pub fn set_capacity_limit(&self, bytes: usize) {
        self.capacity.store(bytes, Ordering::SeqCst);
    }

    /// Number of successful saves and clears so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }

    async fn wait_if_stalled(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.check_available()?;
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.check_available()?;
        self.wait_if_stalled().await;

        let capacity = self.capacity.load(Ordering::SeqCst);
        if capacity > 0 && value.len() > capacity {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                attempted: value.len(),
            });
        }

        self.slots.write().await.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self, key: &str) -> StorageResult<()> {
        self.check_available()?;
        self.wait_if_stalled().await;
        self.slots.write().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
