//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, in `main`
//! - Route every log line to stderr
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format when TF_LOG=JSON, plain text otherwise

use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the level filter for `config`, falling back to `warn`.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Build the subscriber for `config`, writing to stderr.
pub fn subscriber(config: &ObservabilityConfig) -> Box<dyn Subscriber + Send + Sync> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.log_format {
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
        LogFormat::Text => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    if let Err(e) = subscriber(config).try_init() {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}
