// Server Shutdown Signal

use tokio::sync::watch;

/// Receiving half of the shutdown signal, held by the accept loop
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Wait until shutdown is requested.
    ///
    /// A dropped `ShutdownSender` counts as a request, so a serve task
    /// cannot outlive the handle controlling it.
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Sending half of the shutdown signal, held by the process entry point
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Ask the accept loop to stop taking new connections
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a connected sender/token pair
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
