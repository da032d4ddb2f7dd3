//! Shutdown coordination for the plugin.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cancellation handle shared between the controller and the serve loop.
///
/// Once triggered it stays triggered, so waiters that subscribe late still
/// observe the signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new, untriggered shutdown handle.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the shutdown signal. Repeated calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|triggered| {
            let changed = !*triggered;
            *triggered = true;
            changed
        });
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Future that resolves once shutdown is requested.
    ///
    /// The future owns its receiver, so it can be handed to tasks and to
    /// `axum::serve(..).with_graceful_shutdown(..)`.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Err only when every sender is gone, which also means "stop".
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
