//! Metrics and observability utilities
//!
//! Provides metric registration and record helpers with
//! standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all pipeline metrics
pub const METRICS_PREFIX: &str = "dog_breeds";

/// Histogram buckets for query latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, // 1ms
    0.005, // 5ms
    0.010, // 10ms
    0.025, // 25ms
    0.050, // 50ms
    0.100, // 100ms
    0.250, // 250ms
    0.500, // 500ms
    1.000, // 1s
    2.500, // 2.5s
    5.000, // 5s
    10.00, // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Query metrics
    describe_counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of breed queries served"
    );

    describe_histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Breed query latency in seconds"
    );

    describe_gauge!(
        format!("{}_query_rows", METRICS_PREFIX),
        Unit::Count,
        "Number of rows returned by the last query"
    );

    // Fetch job metrics
    describe_counter!(
        format!("{}_fetch_runs_total", METRICS_PREFIX),
        Unit::Count,
        "Total fetch invocations by outcome"
    );

    describe_counter!(
        format!("{}_store_failures_total", METRICS_PREFIX),
        Unit::Count,
        "Total breed writes that failed and were swallowed"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record query metrics
pub fn record_query(endpoint: &str, duration_secs: f64, rows: usize) {
    counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        "endpoint" => endpoint.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);

    gauge!(
        format!("{}_query_rows", METRICS_PREFIX),
        "endpoint" => endpoint.to_string()
    )
    .set(rows as f64);
}

/// Helper to record one fetch invocation
pub fn record_fetch_run(outcome: &str) {
    counter!(
        format!("{}_fetch_runs_total", METRICS_PREFIX),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Helper to record a swallowed persistence failure
pub fn record_store_failure() {
    counter!(format!("{}_store_failures_total", METRICS_PREFIX)).increment(1);
}
