//! Metrics and observability utilities
//!
//! Prometheus counters with standardized naming conventions; the exporter
//! recorder is installed by the server binary.

use metrics::{counter, describe_counter, Unit};

/// Metrics prefix for all Glossar metrics
pub const METRICS_PREFIX: &str = "glossar";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_entries_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total glossary entries created"
    );

    describe_counter!(
        format!("{}_creates_rejected_total", METRICS_PREFIX),
        Unit::Count,
        "Total rejected attempts to create a glossary entry"
    );

    describe_counter!(
        format!("{}_page_views_total", METRICS_PREFIX),
        Unit::Count,
        "Total glossary page views"
    );

    tracing::info!("Metrics registered");
}

/// Record a successful entry creation
pub fn record_entry_created() {
    counter!(format!("{}_entries_created_total", METRICS_PREFIX)).increment(1);
}

/// Record a rejected create attempt
pub fn record_create_rejected(reason: &str) {
    counter!(
        format!("{}_creates_rejected_total", METRICS_PREFIX),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a glossary page view
pub fn record_page_view(authenticated: bool) {
    counter!(
        format!("{}_page_views_total", METRICS_PREFIX),
        "authenticated" => authenticated.to_string()
    )
    .increment(1);
}
