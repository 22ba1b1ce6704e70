//! Prometheus metrics for the Gatekeeper admin client.
//!
//! Covers:
//! - Log stream connection state
//! - Log stream reconnects and delivered lines
//! - REST request outcomes
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error surfaced on first use.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_int_counter, CounterVec,
    Encoder, Gauge, GaugeVec, IntCounter, TextEncoder,
};

const STREAM_STATES: [&str; 5] = [
    "connecting",
    "authenticating",
    "connected",
    "reconnecting",
    "closed",
];

/// Log stream connection state (1 = connected, 0 = not connected).
pub static LOG_STREAM_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "gk_log_stream_connected",
        "Log stream connection state (1=connected)"
    )
    .unwrap()
});

/// Log stream state machine current state.
/// Labels: state (connecting/authenticating/connected/reconnecting/closed)
pub static LOG_STREAM_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "gk_log_stream_state",
        "Log stream state machine current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Log stream reconnects.
/// Labels: reason (closed/error)
pub static LOG_STREAM_RECONNECT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "gk_log_stream_reconnect_total",
        "Total log stream reconnection attempts",
        &["reason"]
    )
    .unwrap()
});

/// Log lines delivered to the log view.
pub static LOG_LINES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("gk_log_lines_total", "Total log lines received").unwrap()
});

/// REST requests by endpoint and outcome.
/// Labels: endpoint, outcome (ok/error)
pub static API_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "gk_api_requests_total",
        "Total Gatekeeper API requests",
        &["endpoint", "outcome"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Set log stream state. Only the active state is 1.
    pub fn log_stream_state(state: &str) {
        for s in &STREAM_STATES {
            LOG_STREAM_STATE.with_label_values(&[s]).set(0.0);
        }
        LOG_STREAM_STATE.with_label_values(&[state]).set(1.0);
        LOG_STREAM_CONNECTED.set(if state == "connected" { 1.0 } else { 0.0 });
    }

    pub fn log_stream_reconnect(reason: &str) {
        LOG_STREAM_RECONNECT_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn log_line() {
        LOG_LINES_TOTAL.inc();
    }

    pub fn api_request(endpoint: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        API_REQUESTS_TOTAL
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    /// Text exposition of every registered metric.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
