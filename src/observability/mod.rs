//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (RPC counters and latency histograms)
//! ```
//!
//! # Design Decisions
//! - stdout belongs to the handshake; logs never go there
//! - Log level follows the orchestrator's TF_LOG conventions

pub mod logging;
pub mod metrics;
