//! Store metrics collection.
//!
//! Provides standardized metrics for monitoring store operations:
//! - Operation counters by outcome
//! - Latency histograms

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total store operations by operation and outcome.
    pub const OPERATIONS_TOTAL: &str = "jobboard_store_operations_total";

    /// Operation latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "jobboard_store_latency_seconds";
}

/// Record metrics for a completed store operation.
pub fn record_operation(operation: &str, ok: bool, latency_secs: f64) {
    counter!(
        names::OPERATIONS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_secs);
}
