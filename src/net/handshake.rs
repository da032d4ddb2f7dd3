//! Plugin handshake with the orchestrator.
//!
//! # Responsibilities
//! - Check the magic cookie that marks a legitimate plugin launch
//! - Negotiate the application protocol version
//! - Format the handshake line announced on stdout
//!
//! The handshake line is pipe-delimited:
//! `CORE-PROTOCOL|APP-PROTOCOL|NETWORK|ADDRESS|PROTOCOL`, for example
//! `1|6|tcp|127.0.0.1:41231|http`.

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::PluginEnvironment;

/// Value the orchestrator places in `TF_PLUGIN_MAGIC_COOKIE`.
pub const MAGIC_COOKIE_VALUE: &str =
    "d602bf8f470bc67ca7faa0386276bbdd4330efaf76d1a219cb4d6991ca9872b2";

/// Version of the plugin handshake framing itself.
pub const CORE_PROTOCOL_VERSION: u32 = 1;

/// Application protocol versions this server speaks, highest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[u32] = &[6];

/// RPC protocol served on the announced address.
pub const RPC_PROTOCOL: &str = "http";

/// Message shown when the binary is run by hand.
pub const NOT_A_PLUGIN_MESSAGE: &str = "This binary is a plugin. These are not meant to be \
executed directly. Please execute the program that consumes these plugins, which will load \
any plugins automatically";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("{}", NOT_A_PLUGIN_MESSAGE)]
    MissingCookie,

    #[error("incompatible API version with plugin. Plugin version: {supported:?}, Client versions: {requested:?}")]
    UnsupportedProtocol {
        requested: Vec<u32>,
        supported: Vec<u32>,
    },
}

/// Reject launches that did not come from the orchestrator.
pub fn check_magic_cookie(env: &PluginEnvironment) -> Result<(), HandshakeError> {
    match env.magic_cookie.as_deref() {
        Some(MAGIC_COOKIE_VALUE) => Ok(()),
        _ => Err(HandshakeError::MissingCookie),
    }
}

/// Pick the highest protocol version both sides support.
///
/// An orchestrator that does not advertise versions gets the newest one.
pub fn negotiate_protocol_version(requested: &[u32]) -> Result<u32, HandshakeError> {
    if requested.is_empty() {
        return SUPPORTED_PROTOCOL_VERSIONS
            .first()
            .copied()
            .ok_or_else(|| HandshakeError::UnsupportedProtocol {
                requested: Vec::new(),
                supported: Vec::new(),
            });
    }

    requested
        .iter()
        .copied()
        .filter(|version| SUPPORTED_PROTOCOL_VERSIONS.contains(version))
        .max()
        .ok_or_else(|| HandshakeError::UnsupportedProtocol {
            requested: requested.to_vec(),
            supported: SUPPORTED_PROTOCOL_VERSIONS.to_vec(),
        })
}

/// The line written to stdout once the listener is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeLine {
    pub protocol_version: u32,
    pub address: SocketAddr,
}

impl fmt::Display for HandshakeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|tcp|{}|{}",
            CORE_PROTOCOL_VERSION, self.protocol_version, self.address, RPC_PROTOCOL
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_must_match() {
        let mut env = PluginEnvironment::default();
        assert_eq!(check_magic_cookie(&env), Err(HandshakeError::MissingCookie));

        env.magic_cookie = Some("wrong".to_string());
        assert_eq!(check_magic_cookie(&env), Err(HandshakeError::MissingCookie));

        env.magic_cookie = Some(MAGIC_COOKIE_VALUE.to_string());
        assert_eq!(check_magic_cookie(&env), Ok(()));
    }

    #[test]
    fn missing_cookie_explains_itself() {
        assert!(HandshakeError::MissingCookie
            .to_string()
            .starts_with("This binary is a plugin."));
    }

    #[test]
    fn negotiates_highest_common_version() {
        assert_eq!(negotiate_protocol_version(&[5, 6]), Ok(6));
        assert_eq!(negotiate_protocol_version(&[6]), Ok(6));
        assert_eq!(negotiate_protocol_version(&[]), Ok(6));
    }

    #[test]
    fn rejects_disjoint_versions() {
        let err = negotiate_protocol_version(&[4, 5]).unwrap_err();
        assert_eq!(
            err,
            HandshakeError::UnsupportedProtocol {
                requested: vec![4, 5],
                supported: vec![6],
            }
        );
    }

    #[test]
    fn formats_handshake_line() {
        let line = HandshakeLine {
            protocol_version: 6,
            address: "127.0.0.1:41231".parse().unwrap(),
        };
        assert_eq!(line.to_string(), "1|6|tcp|127.0.0.1:41231|http");
    }
}
