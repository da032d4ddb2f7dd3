//! Debug-mode reattach instructions.
//!
//! In debug mode the operator starts the plugin by hand (typically under a
//! debugger) and points the orchestrator at it through
//! `TF_REATTACH_PROVIDERS`.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Serialize;

use crate::net::handshake::RPC_PROTOCOL;

/// Network address entry of a reattach config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReattachAddr {
    pub network: String,
    pub string: String,
}

/// One provider entry of `TF_REATTACH_PROVIDERS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReattachConfig {
    pub protocol: String,
    pub protocol_version: u32,
    pub pid: u32,
    pub test: bool,
    pub addr: ReattachAddr,
}

impl ReattachConfig {
    pub fn new(protocol_version: u32, address: SocketAddr) -> Self {
        Self {
            protocol: RPC_PROTOCOL.to_string(),
            protocol_version,
            pid: std::process::id(),
            test: true,
            addr: ReattachAddr {
                network: "tcp".to_string(),
                string: address.to_string(),
            },
        }
    }
}

/// Render the operator-facing instructions printed on stdout.
pub fn instructions(
    registry_address: &str,
    config: &ReattachConfig,
) -> Result<String, serde_json::Error> {
    let mut providers = BTreeMap::new();
    providers.insert(registry_address, config);
    let json = serde_json::to_string(&providers)?;

    Ok(format!(
        "Provider started. To attach Terraform CLI, set the TF_REATTACH_PROVIDERS environment variable with the following:\n\n\tTF_REATTACH_PROVIDERS='{}'\n",
        json
    ))
}
