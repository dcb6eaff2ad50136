//! Shutdown signal handling.
//!
//! SIGTERM and SIGINT (Ctrl+C elsewhere) flip a watch channel that the HTTP
//! server waits on for graceful shutdown. Tests trigger it directly.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Propagates a shutdown request to the server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// Creates an untriggered shutdown handle.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Spawns the task that listens for process signals.
    #[cfg(unix)]
    pub fn spawn_listener(&self) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            use tokio::signal::unix::{SignalKind, signal};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!("failed to install signal handlers: {}", e);
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("received SIGINT, shutting down"),
            }
            let _ = tx.send(true);
            debug!("signal listener stopped");
        });
    }

    /// Spawns the task that listens for Ctrl+C.
    #[cfg(not(unix))]
    pub fn spawn_listener(&self) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("received Ctrl+C, shutting down");
                let _ = tx.send(true);
            }
        });
    }

    /// Triggers shutdown programmatically.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Returns true if shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once shutdown has been triggered.
    pub async fn wait(self) {
        let mut rx = self.rx;
        // An error means every sender is gone; nothing can trigger us anymore.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}
