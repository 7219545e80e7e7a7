use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::ApiClient;

/// Tri-state reachability signal for the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Online,
    Offline,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServerStatus::Checking => "checking",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        };
        f.write_str(label)
    }
}

/// Shared view of the current server status.
///
/// One current value, no history. The monitor task, the orchestrator's
/// pre-flight check, and the presentation layer all hold clones of the same
/// handle; subscribers see every overwrite through the watch channel.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    tx: Arc<watch::Sender<ServerStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ServerStatus::Checking);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> ServerStatus {
        *self.tx.borrow()
    }

    pub fn set(&self, status: ServerStatus) {
        let previous = self.tx.send_replace(status);
        if previous != status {
            info!("Server status: {} -> {}", previous, status);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerStatus> {
        self.tx.subscribe()
    }
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one availability probe against the service root and record the
/// outcome. Also serves as the manual "retry" trigger, independent of the
/// monitor's schedule.
pub async fn probe(client: &ApiClient, status: &StatusHandle) -> ServerStatus {
    status.set(ServerStatus::Checking);
    match client.check_status().await {
        Ok(_) => {
            status.set(ServerStatus::Online);
            ServerStatus::Online
        }
        Err(e) => {
            warn!("Status probe failed: {}", e);
            status.set(ServerStatus::Offline);
            ServerStatus::Offline
        }
    }
}

/// Periodic availability monitor.
///
/// Probes on start and on every interval tick thereafter. The background
/// task is aborted on `stop()` or drop, so no probe fires after the owning
/// component is gone.
pub struct StatusMonitor {
    status: StatusHandle,
    task: JoinHandle<()>,
}

impl StatusMonitor {
    pub fn start(client: ApiClient, status: StatusHandle, interval: Duration) -> Self {
        let task = tokio::spawn({
            let status = status.clone();
            async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    probe(&client, &status).await;
                }
            }
        });
        Self { status, task }
    }

    pub fn status(&self) -> ServerStatus {
        self.status.current()
    }

    pub fn handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn dead_client() -> ApiClient {
        // Nothing listens on port 1; every probe fails fast.
        ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_ms: 500,
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ServerStatus::Checking.to_string(), "checking");
        assert_eq!(ServerStatus::Online.to_string(), "online");
        assert_eq!(ServerStatus::Offline.to_string(), "offline");
    }

    #[test]
    fn test_handle_starts_checking() {
        assert_eq!(StatusHandle::new().current(), ServerStatus::Checking);
    }

    #[test]
    fn test_handle_overwrites_value() {
        let handle = StatusHandle::new();
        handle.set(ServerStatus::Online);
        assert_eq!(handle.current(), ServerStatus::Online);
        handle.set(ServerStatus::Offline);
        assert_eq!(handle.current(), ServerStatus::Offline);
    }

    #[test]
    fn test_clones_share_the_same_value() {
        let handle = StatusHandle::new();
        let other = handle.clone();
        handle.set(ServerStatus::Online);
        assert_eq!(other.current(), ServerStatus::Online);
    }

    #[tokio::test]
    async fn test_failed_probe_transitions_to_offline() {
        let status = StatusHandle::new();
        let result = probe(&dead_client(), &status).await;
        assert_eq!(result, ServerStatus::Offline);
        assert_eq!(status.current(), ServerStatus::Offline);
    }

    #[tokio::test]
    async fn test_stopped_monitor_makes_no_further_transitions() {
        let status = StatusHandle::new();
        let mut rx = status.subscribe();
        let monitor = StatusMonitor::start(
            dead_client(),
            status.clone(),
            Duration::from_millis(50),
        );

        // Wait for the initial probe to settle on offline.
        while status.current() != ServerStatus::Offline {
            rx.changed().await.unwrap();
        }

        monitor.stop();

        // Let any probe that was already past its tick drain, then demand
        // several intervals worth of silence.
        tokio::time::sleep(Duration::from_millis(50)).await;
        rx.mark_unchanged();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!rx.has_changed().unwrap());
    }
}
