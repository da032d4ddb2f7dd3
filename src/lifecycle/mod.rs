//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse args → Build ServeConfig → Construct provider → Serve
//!
//! Shutdown (shutdown.rs):
//!     Controller RPC or interrupt → trigger → RPC server drains → serve returns
//!
//! Signals (signals.rs):
//!     SIGINT → shutdown (debug mode) or ignored (under the orchestrator)
//! ```
//!
//! # Design Decisions
//! - Ordered startup, one pass, no re-entry into serving
//! - Every failure is terminal; restarts belong to the orchestrator

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Bootstrap, Phase};
