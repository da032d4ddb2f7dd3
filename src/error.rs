//! Top-level error of the bootstrap path and its mapping to exit status.

use thiserror::Error;

use crate::plugin::ServeError;
use crate::provider::ConstructionError;

/// Every way the bootstrap can end other than orderly shutdown.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Malformed or unrecognised process arguments.
    #[error(transparent)]
    Arguments(#[from] clap::Error),

    /// The provider factory failed. Indicates a programming defect.
    #[error("failed to construct provider: {0}")]
    Construction(#[from] ConstructionError),

    /// The serving capability reported a transport, handshake or protocol fault.
    #[error(transparent)]
    Serve(#[from] ServeError),
}

impl BootstrapError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::Arguments(e) => u8::try_from(e.exit_code()).unwrap_or(2),
            BootstrapError::Construction(_) | BootstrapError::Serve(_) => 1,
        }
    }

    /// The error text collapsed onto a single line.
    pub fn diagnostic(&self) -> String {
        single_line(&self.to_string())
    }
}

/// Collapse all whitespace runs (newlines included) into single spaces.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::HandshakeError;

    #[test]
    fn serve_errors_exit_one_with_their_message() {
        let err = BootstrapError::from(ServeError::Transport(std::io::Error::other(
            "transport closed unexpectedly",
        )));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.diagnostic(), "transport closed unexpectedly");
    }

    #[test]
    fn construction_errors_are_fatal() {
        let err = BootstrapError::from(ConstructionError("bad wiring".to_string()));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.diagnostic(), "failed to construct provider: bad wiring");
    }

    #[test]
    fn diagnostics_are_single_line() {
        let err = BootstrapError::from(ServeError::Transport(std::io::Error::other(
            "handshake failed:\n  peer went away\n",
        )));
        assert_eq!(err.diagnostic(), "handshake failed: peer went away");
    }

    #[test]
    fn handshake_errors_keep_their_text() {
        let err = BootstrapError::from(ServeError::from(HandshakeError::MissingCookie));
        assert!(!err.diagnostic().contains('\n'));
        assert!(err.diagnostic().starts_with("This binary is a plugin."));
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("  a\n\tb  c \n"), "a b c");
        assert_eq!(single_line(""), "");
    }
}
