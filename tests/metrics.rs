//! Request metrics emitted by `send`, observed through a local recorder.

use std::sync::Mutex;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use metrics_util::MetricKind;

use envoy_client::observability::metrics::set_enabled;
use envoy_client::{RequestBuilder, Transport, TransportError};

// The enable flag is process-wide.
static SERIAL: Mutex<()> = Mutex::new(());

struct OkTransport;

impl Transport for OkTransport {
    async fn execute(
        &self,
        _request: reqwest::Request,
    ) -> Result<reqwest::Response, TransportError> {
        let response = http::Response::builder()
            .status(201)
            .body("")
            .map_err(TransportError::other)?;
        Ok(reqwest::Response::from(response))
    }
}

struct DownTransport;

impl Transport for DownTransport {
    async fn execute(
        &self,
        _request: reqwest::Request,
    ) -> Result<reqwest::Response, TransportError> {
        Err(TransportError::other("upstream unreachable"))
    }
}

#[derive(Debug, PartialEq)]
struct Sample {
    kind: MetricKind,
    name: String,
    labels: Vec<(String, String)>,
    count: usize,
}

fn samples(snapshotter: &Snapshotter) -> Vec<Sample> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| {
            let count = match value {
                DebugValue::Counter(n) => n as usize,
                DebugValue::Histogram(values) => values.len(),
                DebugValue::Gauge(_) => 0,
            };
            let mut labels: Vec<(String, String)> = key
                .key()
                .labels()
                .map(|l| (l.key().to_string(), l.value().to_string()))
                .collect();
            labels.sort();
            Sample {
                kind: key.kind(),
                name: key.key().name().to_string(),
                labels,
                count,
            }
        })
        .collect()
}

fn labels(method: &str, service: &str, status: &str) -> Vec<(String, String)> {
    vec![
        ("method".to_string(), method.to_string()),
        ("service".to_string(), service.to_string()),
        ("status".to_string(), status.to_string()),
    ]
}

fn send_with<T: Transport>(recorder: &DebuggingRecorder, builder: &mut RequestBuilder<T>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    metrics::with_local_recorder(recorder, || {
        let _ = runtime.block_on(builder.send());
    });
}

#[test]
fn test_successful_send_is_counted_with_status() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    set_enabled(true);

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let mut builder = RequestBuilder::with_transport(OkTransport);
    builder
        .egress("http://sidecar:15001")
        .service("orders")
        .post("/v1/orders");
    send_with(&recorder, &mut builder);

    let samples = samples(&snapshotter);
    assert!(samples.contains(&Sample {
        kind: MetricKind::Counter,
        name: "envoy_client_requests_total".to_string(),
        labels: labels("POST", "orders", "201"),
        count: 1,
    }));
    assert!(samples.contains(&Sample {
        kind: MetricKind::Histogram,
        name: "envoy_client_request_duration_seconds".to_string(),
        labels: labels("POST", "orders", "201"),
        count: 1,
    }));
}

#[test]
fn test_transport_failure_is_labelled_error() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    set_enabled(true);

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let mut builder = RequestBuilder::with_transport(DownTransport);
    builder
        .egress("http://sidecar:15001")
        .service("users")
        .get("/v1/users");
    send_with(&recorder, &mut builder);
    send_with(&recorder, &mut builder);

    let samples = samples(&snapshotter);
    assert!(samples.contains(&Sample {
        kind: MetricKind::Counter,
        name: "envoy_client_requests_total".to_string(),
        labels: labels("GET", "users", "error"),
        count: 2,
    }));
}

#[test]
fn test_disabled_metrics_emit_nothing() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    set_enabled(false);

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let mut builder = RequestBuilder::with_transport(OkTransport);
    builder
        .egress("http://sidecar:15001")
        .service("orders")
        .delete("/v1/orders/1");
    send_with(&recorder, &mut builder);
    set_enabled(true);

    assert!(samples(&snapshotter).is_empty());
}
