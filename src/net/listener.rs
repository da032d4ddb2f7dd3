//! Loopback TCP listener for the RPC channel.
//!
//! # Responsibilities
//! - Bind to the loopback interface only
//! - Honour the port range handed down by the orchestrator
//! - Report bind failures with the address that failed

use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

use crate::config::PortRange;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address.
    Bind(SocketAddr, std::io::Error),
    /// No port in the configured range was free.
    Exhausted(PortRange),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(addr, e) => write!(f, "Failed to bind {}: {}", addr, e),
            ListenerError::Exhausted(range) => {
                write!(f, "No free port between {} and {}", range.min, range.max)
            }
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Bind(_, e) => Some(e),
            ListenerError::Exhausted(_) => None,
        }
    }
}

/// Bind a loopback listener, walking `range` when one is configured.
pub async fn bind_loopback(range: Option<PortRange>) -> Result<TcpListener, ListenerError> {
    let listener = match range {
        None => {
            let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
            TcpListener::bind(addr)
                .await
                .map_err(|e| ListenerError::Bind(addr, e))?
        }
        Some(range) => bind_in_range(range).await?,
    };

    if let Ok(local_addr) = listener.local_addr() {
        tracing::debug!(address = %local_addr, "Listener bound");
    }

    Ok(listener)
}

async fn bind_in_range(range: PortRange) -> Result<TcpListener, ListenerError> {
    for port in range.min..=range.max {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::trace!(port, error = %e, "Port unavailable, trying next");
            }
        }
    }
    Err(ListenerError::Exhausted(range))
}
