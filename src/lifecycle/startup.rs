//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse process arguments
//! - Build the serve configuration
//! - Construct the provider handle for the build version
//! - Enter the serve loop and report how it ended
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried
//! - Steps run strictly in order, each at most once
//! - The controller never exits the process; `main` maps the result to an
//!   exit status

use std::ffi::OsString;
use std::fmt;

use tokio::sync::watch;

use crate::cli::Cli;
use crate::config::ServeConfig;
use crate::error::BootstrapError;
use crate::lifecycle::Shutdown;
use crate::plugin::Serve;
use crate::provider::ProviderFactory;

/// Process-level lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Starting,
    ParsingArgs,
    ConfiguringServe,
    ConstructingProvider,
    Serving,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::ParsingArgs => "parsing_args",
            Phase::ConfiguringServe => "configuring_serve",
            Phase::ConstructingProvider => "constructing_provider",
            Phase::Serving => "serving",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// The bootstrap/serve controller.
pub struct Bootstrap<F, S> {
    version: String,
    factory: F,
    server: S,
    shutdown: Shutdown,
    phase: watch::Sender<Phase>,
}

impl<F, S> Bootstrap<F, S>
where
    F: ProviderFactory,
    S: Serve,
{
    /// Create a controller for the given build version.
    pub fn new(version: impl Into<String>, factory: F, server: S) -> Self {
        Self {
            version: version.into(),
            factory,
            server,
            shutdown: Shutdown::new(),
            phase: watch::channel(Phase::Starting).0,
        }
    }

    /// Handle that cancels the serve loop once triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Receiver observing every phase transition, ending at `Terminated`.
    pub fn phases(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    fn advance(&mut self, next: Phase) {
        let previous = self.phase.send_replace(next);
        debug_assert!(next > previous, "lifecycle phases only move forward");
        tracing::debug!(from = %previous, to = %next, "Lifecycle transition");
    }

    /// Run the full lifecycle with `args` (program name first).
    pub async fn run<I, T>(mut self, args: I) -> Result<(), BootstrapError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let result = self.run_phases(args).await;
        self.advance(Phase::Terminated);
        result
    }

    async fn run_phases<I, T>(&mut self, args: I) -> Result<(), BootstrapError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.advance(Phase::ParsingArgs);
        let cli = Cli::try_parse_args(args)?;

        self.advance(Phase::ConfiguringServe);
        let config = ServeConfig::new(cli.debug);

        self.advance(Phase::ConstructingProvider);
        let provider = self.factory.construct(&self.version)?;

        tracing::info!(
            version = %self.version,
            address = %config.address,
            debug = config.debug,
            "Starting provider"
        );

        self.advance(Phase::Serving);
        self.server
            .serve(self.shutdown.clone(), provider, config)
            .await?;

        tracing::debug!("Serve loop returned, orchestrator closed the channel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Starting < Phase::ParsingArgs);
        assert!(Phase::ParsingArgs < Phase::ConfiguringServe);
        assert!(Phase::ConfiguringServe < Phase::ConstructingProvider);
        assert!(Phase::ConstructingProvider < Phase::Serving);
        assert!(Phase::Serving < Phase::Terminated);
        assert_eq!(Phase::ConstructingProvider.to_string(), "constructing_provider");
    }
}
