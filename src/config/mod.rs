//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process arguments
//!     → cli.rs (debug flag)
//!     → schema.rs (ServeConfig, registry address constant)
//!
//! process environment (set by the orchestrator)
//!     → loader.rs (parse handshake and logging variables)
//!     → validation.rs (semantic checks)
//!     → PluginEnvironment / ObservabilityConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reloads at runtime
//! - All fields have defaults so an empty environment is valid
//! - Validation separates syntactic (loader) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    LogFormat, ObservabilityConfig, PluginEnvironment, PortRange, ServeConfig, REGISTRY_ADDRESS,
};
pub use validation::ValidationError;
