//! Pluggable HTTP transport.
//!
//! # Responsibilities
//! - Execute a fully built request and hand back the raw response
//! - Own connection pooling, TLS and timeouts
//!
//! # Design Decisions
//! - Native `impl Future` in traits, no boxing
//! - Implementors need nothing beyond `execute`; no `Default` or `Clone` bound
//! - The default reqwest client is created on first use, not at builder construction
//! - Status codes are not interpreted; a 503 is still `Ok`

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use crate::client::error::TransportError;
use crate::config::TimeoutConfig;

/// Capability that performs the network I/O for a request.
pub trait Transport: Send + Sync {
    /// Execute `request`, returning the response or the transport failure.
    fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = Result<reqwest::Response, TransportError>> + Send;
}

/// Default transport backed by a pooled `reqwest::Client`.
///
/// `ReqwestTransport::default()` holds no client until the first request.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: OnceLock<reqwest::Client>,
}

impl ReqwestTransport {
    /// Wrap an existing client, keeping its pool and settings.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client: OnceLock::from(client),
        }
    }

    /// Build a client with the connect and request timeouts from config.
    pub fn from_config(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::new(builder.build()?))
    }

    /// The underlying reqwest client, created with defaults if none was set.
    pub fn client(&self) -> &reqwest::Client {
        self.client.get_or_init(|| {
            tracing::debug!("No client configured, using reqwest defaults");
            reqwest::Client::new()
        })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, TransportError> {
        Ok(self.client().execute(request).await?)
    }
}
