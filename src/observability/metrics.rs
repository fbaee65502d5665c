//! Request metrics.
//!
//! # Metrics
//! - `envoy_client_requests_total` (counter): requests by method, service, status
//! - `envoy_client_request_duration_seconds` (histogram): transport latency
//!
//! Transport failures are labelled with status `error`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn request metrics on or off for the whole process.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Record one completed (or failed) request.
pub fn record_request(method: &str, service: &str, status: Option<u16>, start: Instant) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let status = status.map_or_else(|| "error".to_string(), |code| code.to_string());
    let labels = [
        ("method", method.to_string()),
        ("service", service.to_string()),
        ("status", status),
    ];

    metrics::counter!("envoy_client_requests_total", &labels).increment(1);
    metrics::histogram!("envoy_client_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
