//! Fluent request builder for calls routed through the egress proxy.
//!
//! # Responsibilities
//! - Compose `<egress>/<service><path>` from the service name and path
//! - Attach Envoy retry and timeout hints as request headers
//! - Materialize a `reqwest::Request` and execute it on a transport
//!
//! # Design Decisions
//! - Mutators take `&mut self` so one builder can be reconfigured and re-sent
//! - No validation in mutators; defects surface when the request is built
//! - `build_request` panics on a malformed configuration, `try_build_request` does not
//! - Header keys are stored lower-cased, so `X-Foo` and `x-foo` are one entry

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::client::error::{BuildError, TransportError};
use crate::client::retry_on::RetryOn;
use crate::client::transport::{ReqwestTransport, Transport};
use crate::client::{
    MAX_RETRIES_HEADER, PER_TRY_TIMEOUT_HEADER, REQUEST_ID_HEADER,
    RETRIABLE_STATUS_CODES_HEADER, RETRY_ON_HEADER, UPSTREAM_TIMEOUT_HEADER,
};
use crate::config::egress::resolve_egress;
use crate::config::ClientConfig;
use crate::observability::metrics;

/// Builder for a single outbound call through the sidecar.
///
/// Not synchronized: use one builder per logical call, or guard it externally.
#[derive(Debug)]
pub struct RequestBuilder<T = ReqwestTransport> {
    service_name: String,
    uri: String,
    method: Option<Method>,
    headers: HashMap<String, String>,
    body: Option<String>,
    egress: Option<String>,
    transport: T,
}

impl RequestBuilder<ReqwestTransport> {
    /// Create an empty builder using the default reqwest transport.
    ///
    /// The reqwest client itself is only created when the first request is sent.
    pub fn new() -> Self {
        Self::empty(ReqwestTransport::default())
    }

    /// Create a builder preloaded with defaults from a client config.
    ///
    /// The transport is built eagerly so configured timeouts apply.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::from_config(&config.timeouts)?;
        let mut builder = Self::with_transport(transport);

        if let Some(egress) = &config.egress {
            builder.egress(egress.clone());
        }
        if let Some(max_retries) = config.retries.max_retries {
            builder.retries(max_retries);
        }
        if let Some(policy) = config.retries.retry_on {
            builder.retry_on(policy);
        }
        if !config.retries.retriable_status_codes.is_empty() {
            builder.retriable_status_codes(&config.retries.retriable_status_codes);
        }
        if let Some(ms) = config.timeouts.upstream_ms {
            builder.upstream_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.timeouts.per_try_ms {
            builder.per_try_timeout(Duration::from_millis(ms));
        }
        for (name, value) in &config.headers {
            builder.header(name.clone(), value.clone());
        }

        Ok(builder)
    }
}

impl Default for RequestBuilder<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RequestBuilder<T> {
    /// Create an empty builder that sends through `transport`.
    pub fn with_transport(transport: T) -> Self {
        Self::empty(transport)
    }

    fn empty(transport: T) -> Self {
        Self {
            service_name: String::new(),
            uri: String::new(),
            method: None,
            headers: HashMap::new(),
            body: None,
            egress: None,
            transport,
        }
    }

    /// Set the logical upstream service, used as the first path segment.
    pub fn service(&mut self, name: impl Into<String>) -> &mut Self {
        self.service_name = name.into();
        self
    }

    /// Set `x-envoy-max-retries`. The value is passed through unchecked.
    pub fn retries(&mut self, retries: i64) -> &mut Self {
        self.header(MAX_RETRIES_HEADER, retries.to_string())
    }

    /// Set `x-envoy-retry-on`, replacing any earlier policy.
    pub fn retry_on(&mut self, policy: RetryOn) -> &mut Self {
        self.header(RETRY_ON_HEADER, policy.as_str())
    }

    /// Set `x-envoy-retriable-status-codes` as a comma-separated list.
    pub fn retriable_status_codes(&mut self, codes: &[u16]) -> &mut Self {
        let joined = codes
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.header(RETRIABLE_STATUS_CODES_HEADER, joined)
    }

    /// Set `x-envoy-upstream-rq-timeout-ms`.
    pub fn upstream_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.header(UPSTREAM_TIMEOUT_HEADER, timeout.as_millis().to_string())
    }

    /// Set `x-envoy-upstream-rq-per-try-timeout-ms`.
    pub fn per_try_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.header(PER_TRY_TIMEOUT_HEADER, timeout.as_millis().to_string())
    }

    /// Tag the call with a fresh `x-request-id`.
    pub fn request_id(&mut self) -> &mut Self {
        self.header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string())
    }

    /// Set an arbitrary header. Last write wins.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into().to_ascii_lowercase();
        self.headers.insert(name, value.into());
        self
    }

    /// Store a payload. It is kept on the builder but never transmitted.
    pub fn body(&mut self, data: impl Into<String>) -> &mut Self {
        self.body = Some(data.into());
        self
    }

    /// Pin the egress address instead of reading `CLIENT_EGRESS`.
    ///
    /// Only affects method calls made after this one.
    pub fn egress(&mut self, address: impl Into<String>) -> &mut Self {
        self.egress = Some(address.into());
        self
    }

    /// Target `<egress>/<service><path>` with GET.
    pub fn get(&mut self, path: &str) -> &mut Self {
        self.route(Method::GET, path)
    }

    /// Target `<egress>/<service><path>` with POST.
    pub fn post(&mut self, path: &str) -> &mut Self {
        self.route(Method::POST, path)
    }

    /// Target `<egress>/<service><path>` with PUT.
    pub fn put(&mut self, path: &str) -> &mut Self {
        self.route(Method::PUT, path)
    }

    /// Target `<egress>/<service><path>` with DELETE.
    pub fn delete(&mut self, path: &str) -> &mut Self {
        self.route(Method::DELETE, path)
    }

    fn route(&mut self, method: Method, path: &str) -> &mut Self {
        let egress = resolve_egress(self.egress.as_deref());
        // No slash normalization: path is expected to start with '/'.
        self.uri = format!("{}/{}{}", egress, self.service_name, path);
        tracing::debug!(method = %method, uri = %self.uri, "Request target resolved");
        self.method = Some(method);
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Resolved URI, empty until a method has been chosen.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Look up a configured header, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body_data(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Build the request, reporting configuration defects as errors.
    pub fn try_build_request(&self) -> Result<reqwest::Request, BuildError> {
        let method = self.method.clone().ok_or(BuildError::MissingMethod)?;
        let url = Url::parse(&self.uri).map_err(|source| BuildError::InvalidUri {
            uri: self.uri.clone(),
            source,
        })?;
        if rewrites_path(raw_path(&self.uri)) {
            return Err(BuildError::RewrittenPath {
                uri: self.uri.clone(),
                sent: url.path().to_string(),
            });
        }

        if self.body.is_some() {
            tracing::warn!(uri = %self.uri, "Configured body is not transmitted");
        }

        let mut request = reqwest::Request::new(method, url);
        let headers = request.headers_mut();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| BuildError::InvalidHeaderName { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| BuildError::InvalidHeaderValue { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        Ok(request)
    }

    /// Build the request.
    ///
    /// # Panics
    /// On any configuration defect (method unset, URI that does not parse,
    /// dot segments the URL parser would resolve away, invalid header). These are programming errors, not runtime conditions.
    pub fn build_request(&self) -> reqwest::Request {
        match self.try_build_request() {
            Ok(request) => request,
            Err(e) => panic!("malformed request configuration: {}", e),
        }
    }
}

impl<T: Transport> RequestBuilder<T> {
    /// Build the request and execute it on the builder's transport.
    ///
    /// Status codes are not inspected and nothing is retried. The response
    /// body is left for the caller to consume.
    ///
    /// # Panics
    /// Same conditions as [`RequestBuilder::build_request`].
    pub async fn send(&mut self) -> Result<reqwest::Response, TransportError> {
        let request = self.build_request();
        let method = request.method().clone();

        let start = Instant::now();
        let result = self.transport.execute(request).await;

        match &result {
            Ok(response) => {
                tracing::debug!(
                    method = %method,
                    uri = %self.uri,
                    status = response.status().as_u16(),
                    "Request completed"
                );
                metrics::record_request(
                    method.as_str(),
                    &self.service_name,
                    Some(response.status().as_u16()),
                    start,
                );
            }
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    uri = %self.uri,
                    error = %e,
                    "Request failed at transport layer"
                );
                metrics::record_request(method.as_str(), &self.service_name, None, start);
            }
        }

        result
    }
}

/// Path portion of a composed URI, before any query or fragment.
fn raw_path(uri: &str) -> &str {
    let after_scheme = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    let path = after_scheme.find('/').map_or("", |i| &after_scheme[i..]);
    path.split(['?', '#']).next().unwrap_or_default()
}

/// True when URL parsing would drop or merge segments of `path`.
fn rewrites_path(path: &str) -> bool {
    path.contains('\\')
        || path.split('/').any(|segment| {
            matches!(
                segment.to_ascii_lowercase().as_str(),
                "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
            )
        })
}
