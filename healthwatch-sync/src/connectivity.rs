//! Connectivity monitor
//!
//! Mirrors the host's own online/offline signal. There is no polling and no
//! reachability probe: whatever the host reports is believed, so a captive
//! portal can look "online".

use std::sync::Arc;
use tokio::sync::watch;

/// Shared online/offline state. Clones observe and drive the same state.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Starts from the host's reachability signal at startup
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { state: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Host reported "became online"
    pub fn went_online(&self) -> bool {
        self.set_online(true)
    }

    /// Host reported "became offline"
    pub fn went_offline(&self) -> bool {
        self.set_online(false)
    }

    /// Records a host event. Returns true when it was an actual transition;
    /// subscribers are only woken in that case.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });

        if changed {
            tracing::info!(online, "Connectivity changed");
        }

        changed
    }

    /// Receiver woken on every transition
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}
