//! Envoy retry-on policy tokens.
//!
//! See <https://www.envoyproxy.io/docs/envoy/latest/configuration/http/http_filters/router_filter#x-envoy-retry-on>.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Condition under which the proxy retries an upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RetryOn {
    #[serde(rename = "5xx")]
    ServerError,
    #[serde(rename = "gateway-error")]
    GatewayError,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "connect-failure")]
    ConnectFailure,
    #[serde(rename = "envoy-ratelimited")]
    EnvoyRateLimited,
    #[serde(rename = "retriable-4xx")]
    Retriable4xx,
    #[serde(rename = "refused-stream")]
    RefusedStream,
    #[serde(rename = "retriable-status-codes")]
    RetriableStatusCodes,
    #[serde(rename = "retriable-headers")]
    RetriableHeaders,
    #[serde(rename = "http3-post-connect-failure")]
    Http3PostConnectFailure,
}

impl RetryOn {
    /// Every token, in Envoy documentation order.
    pub const ALL: [RetryOn; 10] = [
        RetryOn::ServerError,
        RetryOn::GatewayError,
        RetryOn::Reset,
        RetryOn::ConnectFailure,
        RetryOn::EnvoyRateLimited,
        RetryOn::Retriable4xx,
        RetryOn::RefusedStream,
        RetryOn::RetriableStatusCodes,
        RetryOn::RetriableHeaders,
        RetryOn::Http3PostConnectFailure,
    ];

    /// The literal header token.
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryOn::ServerError => "5xx",
            RetryOn::GatewayError => "gateway-error",
            RetryOn::Reset => "reset",
            RetryOn::ConnectFailure => "connect-failure",
            RetryOn::EnvoyRateLimited => "envoy-ratelimited",
            RetryOn::Retriable4xx => "retriable-4xx",
            RetryOn::RefusedStream => "refused-stream",
            RetryOn::RetriableStatusCodes => "retriable-status-codes",
            RetryOn::RetriableHeaders => "retriable-headers",
            RetryOn::Http3PostConnectFailure => "http3-post-connect-failure",
        }
    }
}

impl fmt::Display for RetryOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known retry-on token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown retry-on token '{0}'")]
pub struct UnknownRetryOn(pub String);

impl FromStr for RetryOn {
    type Err = UnknownRetryOn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RetryOn::ALL
            .iter()
            .copied()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| UnknownRetryOn(s.to_string()))
    }
}
