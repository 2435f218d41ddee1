//! Store metrics collection.
//!
//! Provides standardized metrics for monitoring store operations:
//! - Request counters by operation, collection and outcome
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total store requests by operation, collection and outcome.
    pub const REQUESTS_TOTAL: &str = "orbit_store_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "orbit_store_latency_seconds";
}

/// Record metrics for a completed store request.
pub fn record_request(operation: &str, collection: &str, outcome: &str, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "collection" => collection.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}
