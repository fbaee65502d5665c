//! Error definitions for request building and execution.

use thiserror::Error;

/// Failure reported by a transport while executing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The reqwest client failed (connect, DNS, timeout, protocol).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure from a custom transport implementation.
    #[error("transport error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap an arbitrary error from a custom transport.
    pub fn other<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TransportError::Other(error.into())
    }
}

/// Configuration defect detected while materializing a request.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No method-setting call was made.
    #[error("request method not set; call get, post, put or delete first")]
    MissingMethod,

    /// The composed URI does not parse.
    #[error("invalid request URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parser would resolve dot segments or backslashes, so the
    /// path on the wire would differ from the composed one.
    #[error("request URI '{uri}' would be sent with path '{sent}'")]
    RewrittenPath { uri: String, sent: String },

    /// A header key is not a valid HTTP header name.
    #[error("invalid header name '{name}'")]
    InvalidHeaderName { name: String },

    /// A header value contains bytes not allowed on the wire.
    #[error("invalid value for header '{name}'")]
    InvalidHeaderValue { name: String },
}
