//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for interrupts (Ctrl+C / SIGINT)
//! - Translate them into a shutdown request, or log and ignore them
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Under an orchestrator, interrupts are ignored: the orchestrator sends
//!   the same interrupt to its whole process group and stops the plugin
//!   itself through the controller RPC
//! - In debug mode the operator owns the process, so Ctrl+C stops it

use std::future::Future;
use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// What to do when an interrupt arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptPolicy {
    /// Trigger graceful shutdown.
    Shutdown,
    /// Count and log the interrupt, keep serving.
    Ignore,
}

/// Spawn a task that applies `policy` to every Ctrl+C until shutdown.
pub fn spawn_interrupt_handler(shutdown: Shutdown, policy: InterruptPolicy) -> JoinHandle<()> {
    tokio::spawn(async move {
        handle_interrupts(shutdown, policy, tokio::signal::ctrl_c).await;
    })
}

/// Apply `policy` to interrupts from `next_interrupt` until shutdown fires or
/// the source fails. Returns the number of interrupts seen.
pub async fn handle_interrupts<F, Fut>(
    shutdown: Shutdown,
    policy: InterruptPolicy,
    mut next_interrupt: F,
) -> u64
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let stopped = shutdown.wait();
    tokio::pin!(stopped);
    let mut interrupts: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut stopped => return interrupts,
            result = next_interrupt() => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to listen for interrupts");
                    return interrupts;
                }
                interrupts += 1;
                match policy {
                    InterruptPolicy::Shutdown => {
                        tracing::info!("Interrupt received, shutting down");
                        shutdown.trigger();
                        return interrupts;
                    }
                    InterruptPolicy::Ignore => {
                        tracing::debug!(count = interrupts, "Interrupt ignored, orchestrator controls shutdown");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{mpsc, Mutex};

    /// Feed `count` interrupts, then close the source.
    async fn deliver(policy: InterruptPolicy, count: usize) -> (Shutdown, u64) {
        let shutdown = Shutdown::new();
        let (tx, rx) = mpsc::channel(count.max(1));
        for _ in 0..count {
            tx.send(()).await.unwrap();
        }
        drop(tx);

        let rx = Arc::new(Mutex::new(rx));
        let seen = handle_interrupts(shutdown.clone(), policy, move || {
            let rx = Arc::clone(&rx);
            async move {
                rx.lock()
                    .await
                    .recv()
                    .await
                    .ok_or_else(|| io::Error::other("interrupt source closed"))
            }
        })
        .await;
        (shutdown, seen)
    }

    #[tokio::test]
    async fn interrupt_triggers_shutdown_in_debug() {
        let (shutdown, seen) = deliver(InterruptPolicy::Shutdown, 3).await;
        assert_eq!(seen, 1);
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn interrupts_are_ignored_under_orchestrator() {
        let (shutdown, seen) = deliver(InterruptPolicy::Ignore, 3).await;
        assert_eq!(seen, 3);
        assert!(!shutdown.is_triggered());
    }

    #[tokio::test]
    async fn handler_exits_on_shutdown() {
        let shutdown = Shutdown::new();
        let handle = spawn_interrupt_handler(shutdown.clone(), InterruptPolicy::Ignore);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("handler should stop")
            .unwrap();
    }
}
