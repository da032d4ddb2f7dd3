//! Terraform provider plugin for Dockhand.
//!
//! The binary is launched by the orchestrator, handshakes on stdout and then
//! serves the provider over a loopback RPC channel until told to stop.
//!
//! # Architecture Overview
//!
//! ```text
//!   main.rs
//!     │  observability::logging (stderr)
//!     ▼
//!   lifecycle::Bootstrap
//!     ├─ cli              parse -debug
//!     ├─ config           ServeConfig { registry address, debug }
//!     ├─ provider         ProviderFactory::construct(version)
//!     └─ plugin::Serve    blocks until shutdown
//!          ├─ net         cookie, version negotiation, loopback listener
//!          └─ http        RPC routes → provider::dispatch
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod plugin;
pub mod provider;
pub mod version;

pub use config::ServeConfig;
pub use error::BootstrapError;
pub use lifecycle::{Bootstrap, Shutdown};
pub use plugin::{PluginServer, Serve, ServeError};
pub use provider::{Provider, ProviderFactory};
