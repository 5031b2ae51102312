//! Stop signal shared by the HTTP server and the signal handler.

use tokio::sync::broadcast;

/// One-shot stop notice. Cloning shares the channel, so the signal handler
/// can fire it while `HttpServer::run` waits on its own receiver to drain
/// in-flight requests.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once `trigger` is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every receiver to stop. A no-op when nobody is waiting.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers currently waiting for the stop notice.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
