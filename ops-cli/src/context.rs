//! Process-wide application context
//!
//! Owns every stateful component for the life of the process. Nothing here is
//! global: the context is built once in `main`, passed to each command, and
//! torn down before exit.

use auth_identity::{HttpIdentityProvider, IdentityProvider, SessionStore};
use database_layer::{SlotStore, SqliteSlotStore};
use error_common::Result;
use healthwatch_sync::{ConnectivityMonitor, HttpSubmitter, RemoteSubmitter, SyncQueueManager};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;

pub struct AppContext {
    pub config: AppConfig,
    pub connectivity: ConnectivityMonitor,
    pub queue: Arc<SyncQueueManager>,
    pub sessions: SessionStore,
    pub submitter: Arc<dyn RemoteSubmitter>,
    sqlite: Option<SqliteSlotStore>,
    auto_flush: Option<JoinHandle<()>>,
}

impl AppContext {
    /// Opens the device database and wires the HTTP collaborators
    pub async fn init(config: AppConfig, online: bool) -> Result<Self> {
        let sqlite = SqliteSlotStore::open(&config.storage).await?;
        let submitter = Arc::new(HttpSubmitter::new(config.remote.clone())?);
        let provider = Arc::new(HttpIdentityProvider::new(config.identity.clone())?);

        let mut context =
            Self::assemble(config, Arc::new(sqlite.clone()), submitter, provider, online).await?;
        context.sqlite = Some(sqlite);

        Ok(context)
    }

    /// Builds the context around caller-supplied collaborators
    pub async fn assemble(
        config: AppConfig,
        store: Arc<dyn SlotStore>,
        submitter: Arc<dyn RemoteSubmitter>,
        provider: Arc<dyn IdentityProvider>,
        online: bool,
    ) -> Result<Self> {
        let connectivity = ConnectivityMonitor::new(online);

        let queue = Arc::new(
            SyncQueueManager::open(
                store.clone(),
                submitter.clone(),
                connectivity.clone(),
                config.queue.clone(),
            )
            .await?,
        );

        let sessions = SessionStore::open(store, provider).await?;

        let auto_flush = config
            .queue
            .auto_flush_on_reconnect
            .then(|| queue.spawn_auto_flush());

        tracing::debug!(
            online,
            pending = queue.pending_count().await,
            authenticated = sessions.is_authenticated().await,
            "Application context ready"
        );

        Ok(Self {
            config,
            connectivity,
            queue,
            sessions,
            submitter,
            sqlite: None,
            auto_flush,
        })
    }

    /// Id of the signed-in user, attached to every filed record
    pub async fn reporter_id(&self) -> Option<String> {
        self.sessions.current_session().await.map(|s| s.user_id)
    }

    pub async fn shutdown(mut self) {
        if let Some(handle) = self.auto_flush.take() {
            handle.abort();
        }
        if let Some(sqlite) = self.sqlite.take() {
            sqlite.close().await;
        }
        tracing::debug!("Application context shut down");
    }
}
