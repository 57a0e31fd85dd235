//! Remote submission endpoint
//!
//! The queue manager only depends on [`RemoteSubmitter`]; it makes no
//! assumption about latency or failure mode. [`HttpSubmitter`] is the real
//! endpoint and posts a whole batch as one request so the server accepts or
//! rejects it as a unit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};
use crate::queue::QueueItem;

#[async_trait]
pub trait RemoteSubmitter: Send + Sync {
    /// Transmit a single item
    async fn submit(&self, item: &QueueItem) -> SyncResult<()>;

    /// Transmit a whole flush. The default sends items one by one and stops at
    /// the first failure.
    async fn submit_batch(&self, items: &[QueueItem]) -> SyncResult<()> {
        for item in items {
            self.submit(item).await?;
        }
        Ok(())
    }
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Server base URL
    pub server_url: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080/api/v1".to_string(),
            auth_token: None,
            request_timeout_secs: 30,
        }
    }
}

/// Push request to server
#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    pub items: &'a [QueueItem],
}

/// Push response from server
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub accepted: Vec<Uuid>,
    #[serde(default)]
    pub rejected: Vec<Uuid>,
}

/// Submits queue items over HTTP
pub struct HttpSubmitter {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new(config: RemoteConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SyncError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.server_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> SyncResult<PushResponse> {
        let url = self.endpoint(path);
        let mut req = self.client.post(&url).json(body);

        if let Some(token) = &self.config.auth_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::Remote(format!(
                "Push failed with status: {}",
                response.status()
            )));
        }

        let body = response.bytes().await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if body.is_empty() {
            return Ok(PushResponse::default());
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RemoteSubmitter for HttpSubmitter {
    async fn submit(&self, item: &QueueItem) -> SyncResult<()> {
        self.submit_batch(std::slice::from_ref(item)).await
    }

    async fn submit_batch(&self, items: &[QueueItem]) -> SyncResult<()> {
        let response = self.post("sync/push", &PushRequest { items }).await?;

        if !response.rejected.is_empty() {
            return Err(SyncError::Remote(format!(
                "Server rejected {} of {} items",
                response.rejected.len(),
                items.len()
            )));
        }

        tracing::debug!(
            items = items.len(),
            accepted = response.accepted.len(),
            "Batch accepted by server"
        );

        Ok(())
    }
}
