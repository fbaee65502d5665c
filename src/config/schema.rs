//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::RetryOn;

/// Root configuration for builders created with `RequestBuilder::from_config`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Egress proxy base address. Falls back to `CLIENT_EGRESS`, then the default.
    pub egress: Option<String>,

    /// Retry hints forwarded to the proxy.
    pub retries: RetryDefaults,

    /// Transport and proxy timeouts.
    pub timeouts: TimeoutConfig,

    /// Headers added to every request.
    pub headers: BTreeMap<String, String>,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Default retry hints. Nothing is set unless configured.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RetryDefaults {
    /// Value for `x-envoy-max-retries`.
    pub max_retries: Option<i64>,

    /// Value for `x-envoy-retry-on`.
    pub retry_on: Option<RetryOn>,

    /// Value for `x-envoy-retriable-status-codes`.
    pub retriable_status_codes: Vec<u16>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for the default transport, in seconds.
    pub connect_secs: Option<u64>,

    /// Total request timeout for the default transport, in seconds.
    pub request_secs: Option<u64>,

    /// Proxy-side upstream timeout hint, in milliseconds.
    pub upstream_ms: Option<u64>,

    /// Proxy-side per-attempt timeout hint, in milliseconds.
    pub per_try_ms: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit request metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
