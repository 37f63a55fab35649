//! Prometheus metrics for the monitor.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure (e.g. a
//! duplicate metric name) is a startup bug and crashes on first use of the
//! collector, never later.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec,
    register_histogram, Counter, CounterVec, Encoder, Gauge, GaugeVec, Histogram, TextEncoder,
};

/// Transport state (1 = active, 0 = inactive).
/// Labels: state (disconnected/connecting/connected/reconnecting)
pub static TRANSPORT_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "eqmon_transport_state",
        "Transport state machine current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Reconnection attempts by reason.
pub static RECONNECT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "eqmon_reconnect_total",
        "Total streaming reconnection attempts",
        &["reason"]
    )
    .unwrap()
});

pub static POLL_FAILURES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("eqmon_poll_failures_total", "Total failed poll requests").unwrap()
});

/// Cycles by outcome (ok / compute_failed).
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "eqmon_cycles_total",
        "Total monitoring cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

pub static SYNTHETIC_READINGS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "eqmon_synthetic_readings_total",
        "Total synthetic fallback readings",
        &["reason"]
    )
    .unwrap()
});

pub static DATA_SHAPE_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "eqmon_data_shape_errors_total",
        "Total unrecognized source payloads"
    )
    .unwrap()
});

pub static ALERTS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "eqmon_alerts_total",
        "Total critical equilibrium alerts"
    )
    .unwrap()
});

pub static ETA: Lazy<Gauge> =
    Lazy::new(|| register_gauge!("eqmon_eta", "Last estimated damping rate").unwrap());

pub static LAMBDA: Lazy<Gauge> =
    Lazy::new(|| register_gauge!("eqmon_lambda", "Last estimated coupling strength").unwrap());

/// Last Δ in decimal units.
pub static DELTA: Lazy<Gauge> =
    Lazy::new(|| register_gauge!("eqmon_delta", "Last equilibrium metric (decimal)").unwrap());

pub static EFFICIENCY_PCT: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("eqmon_efficiency_pct", "Last efficiency percentage").unwrap()
});

/// Wall time of the three external calls of a cycle.
pub static COMPUTE_LATENCY_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "eqmon_compute_latency_ms",
        "External computation cycle latency in milliseconds",
        vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap()
});

const TRANSPORT_STATES: [&str; 4] = ["disconnected", "connecting", "connected", "reconnecting"];

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Set the transport state. Only the active state is 1.
    pub fn transport_state_set(state: &str) {
        for s in &TRANSPORT_STATES {
            TRANSPORT_STATE.with_label_values(&[s]).set(0.0);
        }
        TRANSPORT_STATE.with_label_values(&[state]).set(1.0);
    }

    pub fn reconnect(reason: &str) {
        RECONNECT_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn poll_failure() {
        POLL_FAILURES_TOTAL.inc();
    }

    pub fn cycle_completed() {
        CYCLES_TOTAL.with_label_values(&["ok"]).inc();
    }

    pub fn cycle_compute_failed() {
        CYCLES_TOTAL.with_label_values(&["compute_failed"]).inc();
    }

    pub fn synthetic_reading(reason: &str) {
        SYNTHETIC_READINGS_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn data_shape_error() {
        DATA_SHAPE_ERRORS_TOTAL.inc();
    }

    pub fn alert() {
        ALERTS_TOTAL.inc();
    }

    /// Record the parameters submitted this cycle.
    pub fn parameters(eta: f64, lambda: f64) {
        ETA.set(eta);
        LAMBDA.set(lambda);
    }

    /// Record a successful cycle's result.
    pub fn result(delta_decimal: f64, efficiency_percent: f64) {
        DELTA.set(delta_decimal);
        EFFICIENCY_PCT.set(efficiency_percent);
    }

    pub fn compute_latency(latency_ms: f64) {
        COMPUTE_LATENCY_MS.observe(latency_ms);
    }

    /// Encode the default registry in the text exposition format.
    pub fn render_text() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state_single_active() {
        Metrics::transport_state_set("reconnecting");
        Metrics::transport_state_set("connected");
        assert_eq!(TRANSPORT_STATE.with_label_values(&["connected"]).get(), 1.0);
        assert_eq!(TRANSPORT_STATE.with_label_values(&["reconnecting"]).get(), 0.0);
        assert_eq!(TRANSPORT_STATE.with_label_values(&["disconnected"]).get(), 0.0);
    }

    #[test]
    fn test_counters_increment() {
        let before = CYCLES_TOTAL.with_label_values(&["compute_failed"]).get();
        Metrics::cycle_compute_failed();
        let after = CYCLES_TOTAL.with_label_values(&["compute_failed"]).get();
        assert_eq!(after - before, 1.0);

        let before = SYNTHETIC_READINGS_TOTAL.with_label_values(&["unreachable"]).get();
        Metrics::synthetic_reading("unreachable");
        assert_eq!(
            SYNTHETIC_READINGS_TOTAL.with_label_values(&["unreachable"]).get() - before,
            1.0
        );
    }

    #[test]
    fn test_render_text_contains_metrics() {
        Metrics::parameters(0.5, 0.6);
        Metrics::compute_latency(12.0);
        let text = Metrics::render_text().unwrap();
        assert!(text.contains("eqmon_eta"));
        assert!(text.contains("eqmon_compute_latency_ms_bucket"));
    }
}
