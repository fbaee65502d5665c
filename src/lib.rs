//! Fluent client for service calls routed through an Envoy egress sidecar.
//!
//! ```no_run
//! use envoy_client::{RequestBuilder, RetryOn};
//!
//! # async fn run() -> Result<(), envoy_client::TransportError> {
//! let mut request = RequestBuilder::new();
//! request
//!     .service("inventory")
//!     .retries(3)
//!     .retry_on(RetryOn::ServerError)
//!     .get("/v1/items/42");
//!
//! let response = request.send().await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod observability;

pub use client::{BuildError, RequestBuilder, RetryOn, Transport, TransportError};
pub use config::ClientConfig;
