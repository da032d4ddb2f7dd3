//! Metrics collection.
//!
//! # Metrics
//! - `provider_rpc_requests_total` (counter): RPCs by method and outcome
//! - `provider_rpc_duration_seconds` (histogram): RPC latency by method
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no exporter is installed, so
//!   updates are no-ops unless an embedding process installs a recorder

use std::time::Instant;

/// Record one completed RPC.
pub fn record_rpc(method: &str, success: bool, start_time: Instant) {
    let outcome = if success { "ok" } else { "error" };

    ::metrics::counter!(
        "provider_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    ::metrics::histogram!(
        "provider_rpc_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}
