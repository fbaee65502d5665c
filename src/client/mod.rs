//! Outbound request client for the sidecar egress proxy.
//!
//! # Data Flow
//! ```text
//! caller
//!     → builder.rs (service, method, path, retry hints, headers)
//!     → config::egress (resolve proxy base address per method call)
//!     → RequestBuilder::build_request (reqwest::Request, panics on bad config)
//!     → transport.rs (execute through reqwest or an injected transport)
//!     → reqwest::Response or TransportError back to the caller
//! ```
//!
//! # Design Decisions
//! - Retry behavior lives in the proxy; the client only sets Envoy headers
//! - Malformed configuration is a programming error and panics
//! - Transport failures are returned, never retried here

pub mod builder;
pub mod error;
pub mod retry_on;
pub mod transport;

pub use builder::RequestBuilder;
pub use error::{BuildError, TransportError};
pub use retry_on::RetryOn;
pub use transport::{ReqwestTransport, Transport};

/// Maximum number of retries the proxy may attempt.
pub const MAX_RETRIES_HEADER: &str = "x-envoy-max-retries";

/// Failure classes that trigger a proxy-side retry.
pub const RETRY_ON_HEADER: &str = "x-envoy-retry-on";

/// Status codes retried when `retriable-status-codes` is active.
pub const RETRIABLE_STATUS_CODES_HEADER: &str = "x-envoy-retriable-status-codes";

/// Overall upstream timeout, in milliseconds.
pub const UPSTREAM_TIMEOUT_HEADER: &str = "x-envoy-upstream-rq-timeout-ms";

/// Timeout per upstream attempt, in milliseconds.
pub const PER_TRY_TIMEOUT_HEADER: &str = "x-envoy-upstream-rq-per-try-timeout-ms";

/// Correlation ID propagated by the mesh.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
