//! Prometheus metrics for scan latency and feed health.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Feed fetch latency metric name.
pub const METRIC_FEED_FETCH_LATENCY: &str = "feed_fetch_latency_ms";
/// Full scan latency metric name.
pub const METRIC_SCAN_LATENCY: &str = "scan_latency_ms";
/// Events scanned counter metric name.
pub const METRIC_EVENTS_SCANNED: &str = "events_scanned_total";
/// Opportunities found counter metric name.
pub const METRIC_OPPORTUNITIES_FOUND: &str = "opportunities_found_total";
/// Feed errors counter metric name.
pub const METRIC_FEED_ERRORS: &str = "feed_errors_total";
/// Remaining API quota gauge metric name.
pub const METRIC_QUOTA_REMAINING: &str = "feed_quota_remaining";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_FEED_FETCH_LATENCY,
        "Odds feed fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SCAN_LATENCY,
        "Full arbitrage scan latency in milliseconds"
    );

    describe_counter!(METRIC_EVENTS_SCANNED, "Total number of events scanned");
    describe_counter!(
        METRIC_OPPORTUNITIES_FOUND,
        "Total number of arbitrage opportunities found"
    );
    describe_counter!(METRIC_FEED_ERRORS, "Total number of odds feed errors");

    describe_gauge!(
        METRIC_QUOTA_REMAINING,
        "Requests remaining on the odds API key"
    );

    debug!("Metrics initialized");
}

/// Record odds feed fetch latency for one market kind.
pub fn record_feed_fetch_latency(start: Instant, market: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FEED_FETCH_LATENCY, "market" => market.to_string()).record(latency_ms);
}

/// Record full scan latency.
pub fn record_scan_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SCAN_LATENCY).record(latency_ms);
}

/// Add to the events scanned counter.
pub fn add_events_scanned(count: u64) {
    counter!(METRIC_EVENTS_SCANNED).increment(count);
}

/// Add to the opportunities found counter.
pub fn add_opportunities_found(count: u64) {
    counter!(METRIC_OPPORTUNITIES_FOUND).increment(count);
}

/// Increment the feed errors counter for one market kind.
pub fn inc_feed_errors(market: &str) {
    counter!(METRIC_FEED_ERRORS, "market" => market.to_string()).increment(1);
}

/// Set the remaining API quota gauge.
pub fn set_quota_remaining(remaining: u64) {
    gauge!(METRIC_QUOTA_REMAINING).set(remaining as f64);
}
