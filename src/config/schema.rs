//! Configuration schema definitions.
//!
//! Every value here is built once at startup and never mutated afterwards.
//! All types derive Serde traits so they can be logged or echoed in
//! structured form.

use serde::{Deserialize, Serialize};

/// Registry address identifying this provider to the orchestrator.
pub const REGISTRY_ADDRESS: &str = "registry.terraform.io/kalebharrison/dockhand";

/// Parameters the serving capability needs to register and run the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServeConfig {
    /// Registry address (namespace/name) of the provider.
    pub address: String,

    /// Run with support for interactive debugger attachment.
    pub debug: bool,
}

impl ServeConfig {
    /// Build the serve configuration for this provider.
    pub fn new(debug: bool) -> Self {
        Self {
            address: REGISTRY_ADDRESS.to_string(),
            debug,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Inclusive TCP port range the listener may bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

/// Handshake parameters handed to the plugin by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginEnvironment {
    /// Value of the magic cookie variable, if present.
    pub magic_cookie: Option<String>,

    /// Application protocol versions offered by the orchestrator.
    /// Empty when the orchestrator did not advertise any.
    pub protocol_versions: Vec<u32>,

    /// Lower bound of the allowed listener ports.
    pub min_port: Option<u16>,

    /// Upper bound of the allowed listener ports.
    pub max_port: Option<u16>,
}

impl PluginEnvironment {
    /// Port range to bind in, when both bounds were provided.
    pub fn port_range(&self) -> Option<PortRange> {
        match (self.min_port, self.max_port) {
            (Some(min), Some(max)) => Some(PortRange { min, max }),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive (trace, debug, info, warn, error, off).
    pub log_level: String,

    /// Output format for log lines on stderr.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
        }
    }
}
