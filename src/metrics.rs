//! Prometheus-style metrics for batch sizing.
//!
//! Nothing is exported unless a recorder is installed; the `scan --metrics`
//! command installs one and prints the rendered text.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

use crate::sizing::Constraint;

// === Metric Name Constants ===

/// Sizing latency metric name.
pub const METRIC_SIZING_LATENCY: &str = "sizing_latency_ms";
/// Positions sized counter metric name.
pub const METRIC_POSITIONS_SIZED: &str = "positions_sized_total";
/// Invalid price counter metric name.
pub const METRIC_INVALID_PRICES: &str = "invalid_prices_total";
/// Filtered quotes counter metric name.
pub const METRIC_QUOTES_FILTERED: &str = "quotes_filtered_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_SIZING_LATENCY,
        "Time to size one quote in milliseconds"
    );
    describe_counter!(
        METRIC_POSITIONS_SIZED,
        "Total number of positions sized, by binding constraint"
    );
    describe_counter!(
        METRIC_INVALID_PRICES,
        "Total number of quotes rejected for invalid prices"
    );
    describe_counter!(
        METRIC_QUOTES_FILTERED,
        "Total number of quotes dropped by the pre-filter"
    );

    debug!("Metrics initialized");
}

/// Record sizing latency.
pub fn record_sizing_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SIZING_LATENCY).record(latency_ms);
}

/// Increment positions sized for a constraint.
pub fn inc_positions_sized(constraint: Constraint) {
    counter!(METRIC_POSITIONS_SIZED, "constraint" => constraint.as_str()).increment(1);
}

/// Increment invalid price rejections.
pub fn inc_invalid_prices() {
    counter!(METRIC_INVALID_PRICES).increment(1);
}

/// Increment quotes dropped by the pre-filter.
pub fn inc_quotes_filtered(reason: &'static str) {
    counter!(METRIC_QUOTES_FILTERED, "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn counters_render_with_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            init_metrics();
            record_sizing_latency(Instant::now());
            inc_positions_sized(Constraint::PositionCap);
            inc_positions_sized(Constraint::PositionCap);
            inc_positions_sized(Constraint::InsufficientFunds);
            inc_invalid_prices();
            inc_quotes_filtered("spread");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"positions_sized_total{constraint="position_cap"} 2"#));
        assert!(rendered.contains(r#"positions_sized_total{constraint="insufficient_funds"} 1"#));
        assert!(rendered.contains("invalid_prices_total 1"));
        assert!(rendered.contains(r#"quotes_filtered_total{reason="spread"} 1"#));
        assert!(rendered.contains(METRIC_SIZING_LATENCY));
    }
}
