//! SQLite-backed slot store
//!
//! One row per slot in a single `slots` table. Writes are upserts executed in
//! autocommit mode, so a failed write never leaves a partially written value.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, Row};
use std::path::PathBuf;

use crate::error::{StorageError, StorageResult};
use crate::slots::SlotStore;

/// Configuration for the device database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file, created if missing
    pub db_path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Whether to enable WAL mode
    pub enable_wal: bool,
    /// Overwrite freed pages so cleared health records do not linger on disk
    pub enable_secure_delete: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("healthwatch.db"),
            max_connections: 1,
            enable_wal: true,
            enable_secure_delete: true,
        }
    }
}

/// Slot store persisted in a local SQLite file
#[derive(Debug, Clone)]
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    /// Open (or create) the device database
    pub async fn open(config: &StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let journal_mode = if config.enable_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };

        let options = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            .journal_mode(journal_mode);

        let secure_delete = if config.enable_secure_delete {
            "PRAGMA secure_delete = ON"
        } else {
            "PRAGMA secure_delete = OFF"
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(secure_delete).await?;
                    Ok(())
                })
            })
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Unavailable(format!(
                "cannot open {}: {}",
                config.db_path.display(),
                e
            )))?;

        let store = Self { pool };
        store.initialize_schema().await?;

        tracing::debug!(db_path = %config.db_path.display(), "Opened device slot store");

        Ok(store)
    }

    async fn initialize_schema(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close database connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SlotStore for SqliteSlotStore {
    async fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get::<Vec<u8>, _>("value")?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(key, value.len(), e))?;

        tracing::trace!(key = key, bytes = value.len(), "Slot saved");

        Ok(())
    }

    async fn clear(&self, key: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM slots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        tracing::trace!(key = key, "Slot cleared");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::keys;
    use tempfile::TempDir;

    async fn create_test_store() -> (TempDir, SqliteSlotStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            db_path: dir.path().join("device.db"),
            ..Default::default()
        };
        let store = SqliteSlotStore::open(&config).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_slot_is_absent() {
        let (_dir, store) = create_test_store().await;
        assert_eq!(store.load(keys::SESSION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_value() {
        let (_dir, store) = create_test_store().await;

        store.save(keys::SYNC_QUEUE, b"[1]").await.unwrap();
        store.save(keys::SYNC_QUEUE, b"[1,2]").await.unwrap();

        assert_eq!(store.load(keys::SYNC_QUEUE).await.unwrap(), Some(b"[1,2]".to_vec()));
    }

    #[tokio::test]
    async fn test_clear_removes_only_that_slot() {
        let (_dir, store) = create_test_store().await;

        store.save(keys::SYNC_QUEUE, b"[]").await.unwrap();
        store.save(keys::SESSION, b"{}").await.unwrap();
        store.clear(keys::SESSION).await.unwrap();

        assert_eq!(store.load(keys::SESSION).await.unwrap(), None);
        assert_eq!(store.load(keys::SYNC_QUEUE).await.unwrap(), Some(b"[]".to_vec()));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            db_path: dir.path().join("nested").join("device.db"),
            ..Default::default()
        };

        let store = SqliteSlotStore::open(&config).await.unwrap();
        store.save(keys::SESSION, b"persisted").await.unwrap();
        store.close().await;

        let reopened = SqliteSlotStore::open(&config).await.unwrap();
        assert_eq!(reopened.load(keys::SESSION).await.unwrap(), Some(b"persisted".to_vec()));
    }

    #[tokio::test]
    async fn test_secure_delete_enabled() {
        let (_dir, store) = create_test_store().await;

        let row = sqlx::query("PRAGMA secure_delete")
            .fetch_one(store.pool())
            .await
            .unwrap();

        let secure_delete: i64 = row.try_get(0).unwrap();
        assert_eq!(secure_delete, 1, "secure_delete should be enabled");
    }
}
