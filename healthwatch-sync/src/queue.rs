//! Offline mutation queue
//!
//! Records that cannot be confirmed by the server yet are appended here and
//! written through to the `sync_queue` slot after every mutation, so the
//! persisted array always equals the in-memory queue.
//!
//! A flush is all-or-nothing: the whole pending batch goes out in one remote
//! submission. Success drops exactly the submitted items; failure keeps every
//! item in place. There is no per-item retry or backoff.

use chrono::{DateTime, Utc};
use database_layer::{keys, Slot, SlotStore, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::connectivity::ConnectivityMonitor;
use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteSubmitter;

/// One locally recorded, not yet confirmed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Unique operation ID
    pub id: Uuid,

    /// Opaque record, never interpreted by the queue
    pub payload: serde_json::Value,

    /// Timestamp when the record was queued
    pub enqueued_at: DateTime<Utc>,

    /// Whether this record has been confirmed by the server
    pub synced: bool,
}

impl QueueItem {
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            enqueued_at: Utc::now(),
            synced: false,
        }
    }
}

/// Queue behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Upper bound on a single remote submission (seconds)
    pub submit_timeout_secs: u64,
    /// Flush automatically on every offline → online transition
    pub auto_flush_on_reconnect: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            submit_timeout_secs: 60,
            auto_flush_on_reconnect: false,
        }
    }
}

impl QueueConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

/// Result of a flush request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Host reports offline, nothing attempted
    Offline,
    /// Nothing pending
    Empty,
    /// Another flush is in flight; this request was dropped
    AlreadySyncing,
    /// The server confirmed `count` items and they left the queue
    Flushed { count: usize },
}

/// Snapshot for pending-count displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub pending: usize,
    pub syncing: bool,
    pub online: bool,
    pub last_flushed_at: Option<DateTime<Utc>>,
}

/// Owns the in-memory queue and is the sole writer of the `sync_queue` slot
pub struct SyncQueueManager {
    slot: Slot,
    queue: Mutex<Vec<QueueItem>>,
    submitter: Arc<dyn RemoteSubmitter>,
    connectivity: ConnectivityMonitor,
    syncing: AtomicBool,
    last_flushed_at: RwLock<Option<DateTime<Utc>>>,
    config: QueueConfig,
}

/// Holds the syncing flag; dropping it (normally, on error, or when the flush
/// future is cancelled) releases the flag.
struct SyncingGuard<'a>(&'a AtomicBool);

impl<'a> SyncingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncQueueManager {
    /// Restores the persisted queue and takes ownership of its slot
    pub async fn open(
        store: Arc<dyn SlotStore>,
        submitter: Arc<dyn RemoteSubmitter>,
        connectivity: ConnectivityMonitor,
        config: QueueConfig,
    ) -> SyncResult<Self> {
        let slot = Slot::new(store, keys::SYNC_QUEUE);

        let queue: Vec<QueueItem> = match slot.load().await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::corrupt(keys::SYNC_QUEUE, e))?,
            None => Vec::new(),
        };

        tracing::debug!(pending = queue.len(), "Restored sync queue");

        Ok(Self {
            slot,
            queue: Mutex::new(queue),
            submitter,
            connectivity,
            syncing: AtomicBool::new(false),
            last_flushed_at: RwLock::new(None),
            config,
        })
    }

    /// Appends a record and persists the full queue before returning.
    ///
    /// The payload is not validated. The in-memory queue only changes once the
    /// slot write has completed, so a failed or cancelled call leaves it as it
    /// was.
    pub async fn enqueue(&self, payload: serde_json::Value) -> SyncResult<QueueItem> {
        let item = QueueItem::new(payload);

        let mut queue = self.queue.lock().await;
        let mut next = queue.clone();
        next.push(item.clone());

        if let Err(e) = self.persist(&next).await {
            tracing::error!(error = %e, pending = queue.len(), "Failed to persist sync queue, record not queued");
            return Err(e);
        }
        *queue = next;

        tracing::debug!(
            operation_id = %item.id,
            pending = queue.len(),
            "Queued record for sync"
        );

        Ok(item)
    }

    /// Ordered, read-only snapshot of the pending items
    pub async fn current_queue(&self) -> Vec<QueueItem> {
        self.queue.lock().await.clone()
    }

    pub async fn pending_count(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            pending: self.pending_count().await,
            syncing: self.is_syncing(),
            online: self.connectivity.is_online(),
            last_flushed_at: *self.last_flushed_at.read().await,
        }
    }

    /// Attempts to transmit every pending item in one remote submission.
    ///
    /// Offline, empty, and already-in-flight requests are no-ops reported via
    /// [`FlushOutcome`]. A remote failure or timeout leaves the queue exactly
    /// as it was and is returned to the caller; nothing is retried here.
    pub async fn flush(&self) -> SyncResult<FlushOutcome> {
        if !self.connectivity.is_online() {
            tracing::debug!("Flush skipped, device offline");
            return Ok(FlushOutcome::Offline);
        }

        if self.queue.lock().await.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let Some(_guard) = SyncingGuard::acquire(&self.syncing) else {
            tracing::debug!("Flush skipped, another flush is in flight");
            return Ok(FlushOutcome::AlreadySyncing);
        };

        let batch = self.queue.lock().await.clone();
        if batch.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        tracing::info!(items = batch.len(), "Flushing sync queue");

        let timeout = self.config.submit_timeout();
        let submitted = match tokio::time::timeout(timeout, self.submitter.submit_batch(&batch)).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout(timeout)),
        };

        if let Err(e) = submitted {
            tracing::warn!(error = %e, pending = batch.len(), "Sync failed, queue preserved");
            return Err(e);
        }

        let flushed: HashSet<Uuid> = batch.iter().map(|item| item.id).collect();

        let mut queue = self.queue.lock().await;
        let remaining: Vec<QueueItem> = queue
            .iter()
            .filter(|item| !flushed.contains(&item.id))
            .cloned()
            .collect();

        if let Err(e) = self.persist(&remaining).await {
            tracing::error!(
                error = %e,
                submitted = batch.len(),
                "Server accepted batch but clearing the local queue failed; items stay queued"
            );
            return Err(e);
        }

        *queue = remaining;
        let still_pending = queue.len();
        drop(queue);

        *self.last_flushed_at.write().await = Some(Utc::now());

        tracing::info!(flushed = batch.len(), pending = still_pending, "Sync queue flushed");

        Ok(FlushOutcome::Flushed { count: batch.len() })
    }

    /// Flushes on every offline → online transition until the handle is aborted
    pub fn spawn_auto_flush(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let mut rx = manager.connectivity.subscribe();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if !online {
                    continue;
                }

                match manager.flush().await {
                    Ok(outcome) => tracing::debug!(?outcome, "Auto-flush after reconnect"),
                    Err(e) => tracing::warn!(error = %e, "Auto-flush after reconnect failed"),
                }
            }
        })
    }

    async fn persist(&self, queue: &[QueueItem]) -> SyncResult<()> {
        let bytes = serde_json::to_vec(queue)?;
        self.slot.save(&bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database_layer::MemorySlotStore;
    use std::sync::atomic::AtomicUsize;

    struct AcceptAll {
        batches: AtomicUsize,
    }

    #[async_trait]
    impl RemoteSubmitter for AcceptAll {
        async fn submit(&self, _item: &QueueItem) -> SyncResult<()> {
            Ok(())
        }

        async fn submit_batch(&self, _items: &[QueueItem]) -> SyncResult<()> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn create_test_manager(online: bool) -> (Arc<MemorySlotStore>, Arc<AcceptAll>, SyncQueueManager) {
        let store = Arc::new(MemorySlotStore::new());
        let submitter = Arc::new(AcceptAll { batches: AtomicUsize::new(0) });
        let manager = SyncQueueManager::open(
            store.clone(),
            submitter.clone(),
            ConnectivityMonitor::new(online),
            QueueConfig::default(),
        )
        .await
        .unwrap();
        (store, submitter, manager)
    }

    async fn persisted(store: &MemorySlotStore) -> Vec<QueueItem> {
        let bytes = store.load(keys::SYNC_QUEUE).await.unwrap().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_writes_through() {
        let (store, _, manager) = create_test_manager(false).await;

        let first = manager.enqueue(serde_json::json!({"n": 1})).await.unwrap();
        let second = manager.enqueue(serde_json::json!({"n": 2})).await.unwrap();

        assert!(!first.synced);
        assert_ne!(first.id, second.id);
        assert_eq!(persisted(&store).await, manager.current_queue().await);
    }

    #[tokio::test]
    async fn test_enqueue_rolls_back_on_storage_failure() {
        let (store, _, manager) = create_test_manager(false).await;
        manager.enqueue(serde_json::json!({"n": 1})).await.unwrap();

        store.set_unavailable(true);
        let err = manager.enqueue(serde_json::json!({"n": 2})).await.unwrap_err();
        store.set_unavailable(false);

        assert!(matches!(err, SyncError::Storage(_)));
        assert_eq!(manager.pending_count().await, 1);
        assert_eq!(persisted(&store).await, manager.current_queue().await);
    }

    #[tokio::test]
    async fn test_open_restores_persisted_queue() {
        let (store, submitter, manager) = create_test_manager(false).await;
        manager.enqueue(serde_json::json!({"type": "water_quality"})).await.unwrap();
        let before = manager.current_queue().await;
        drop(manager);

        let reopened = SyncQueueManager::open(
            store,
            submitter,
            ConnectivityMonitor::new(false),
            QueueConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(reopened.current_queue().await, before);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_slot() {
        let store = Arc::new(MemorySlotStore::new());
        store.save(keys::SYNC_QUEUE, b"not json").await.unwrap();

        let result = SyncQueueManager::open(
            store,
            Arc::new(AcceptAll { batches: AtomicUsize::new(0) }),
            ConnectivityMonitor::new(true),
            QueueConfig::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(SyncError::Storage(StorageError::Corrupt { ref key, .. })) if key == keys::SYNC_QUEUE
        ));
    }

    #[tokio::test]
    async fn test_flush_clears_and_records_time() {
        let (store, submitter, manager) = create_test_manager(true).await;
        manager.enqueue(serde_json::json!({})).await.unwrap();

        let outcome = manager.flush().await.unwrap();

        assert_eq!(outcome, FlushOutcome::Flushed { count: 1 });
        assert_eq!(submitter.batches.load(Ordering::SeqCst), 1);
        assert!(persisted(&store).await.is_empty());

        let status = manager.status().await;
        assert_eq!(status.pending, 0);
        assert!(!status.syncing);
        assert!(status.last_flushed_at.is_some());
    }

    #[tokio::test]
    async fn test_flush_empty_queue_never_submits() {
        let (_, submitter, manager) = create_test_manager(true).await;

        assert_eq!(manager.flush().await.unwrap(), FlushOutcome::Empty);
        assert_eq!(submitter.batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auto_flush_on_reconnect() {
        let (_, submitter, manager) = create_test_manager(false).await;
        let manager = Arc::new(manager);
        manager.enqueue(serde_json::json!({})).await.unwrap();

        let handle = manager.spawn_auto_flush();
        manager.connectivity().went_online();

        for _ in 0..100 {
            if manager.pending_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(manager.pending_count().await, 0);
        assert_eq!(submitter.batches.load(Ordering::SeqCst), 1);
    }
}
