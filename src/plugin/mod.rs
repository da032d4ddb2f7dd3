//! Serving capability.
//!
//! # Data Flow
//! ```text
//! Provider handle + ServeConfig + Shutdown
//!     → Serve::serve
//!         → config::loader (plugin environment)
//!         → net::handshake (cookie, version negotiation)
//!         → net::listener (loopback bind)
//!         → stdout: handshake line | reattach instructions (debug)
//!         → http::RpcServer (until shutdown)
//!     → Ok(()) on orderly shutdown, ServeError otherwise
//! ```
//!
//! # Design Decisions
//! - `Serve` is a trait so the controller can be driven by stubs in tests
//! - The serve call is the only suspension point of the process

pub mod reattach;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ConfigError, ServeConfig};
use crate::lifecycle::Shutdown;
use crate::net::{HandshakeError, ListenerError};
use crate::provider::Provider;

pub use server::PluginServer;

/// Failures reported by the serving capability. All are fatal to the process.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid plugin environment: {0}")]
    Environment(#[from] ConfigError),

    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to announce handshake: {0}")]
    Announce(#[source] std::io::Error),

    #[error(transparent)]
    Transport(std::io::Error),
}

/// Runs a provider behind the plugin protocol until the channel closes.
#[async_trait]
pub trait Serve: Send + Sync {
    /// Blocks until orderly shutdown (`Ok`) or an unrecoverable fault (`Err`).
    async fn serve(
        &self,
        shutdown: Shutdown,
        provider: Arc<dyn Provider>,
        config: ServeConfig,
    ) -> Result<(), ServeError>;
}
