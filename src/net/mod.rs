//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator environment
//!     → handshake.rs (magic cookie, protocol version negotiation)
//!     → listener.rs (loopback bind within the allowed port range)
//!     → handshake line on stdout
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Loopback only; the orchestrator always runs on the same host
//! - stdout carries nothing but the handshake line

pub mod handshake;
pub mod listener;

pub use handshake::{HandshakeError, HandshakeLine};
pub use listener::{bind_loopback, ListenerError};
