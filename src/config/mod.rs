//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (defaults for every builder created from it)
//!
//! On every get/post/put/delete:
//!     egress.rs resolves the proxy address
//!     (builder override → CLIENT_EGRESS → http://envoy:9000)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - The environment is read per call, never cached
//! - Validation separates syntactic (serde) from semantic checks

pub mod egress;
pub mod loader;
pub mod schema;
pub mod validation;

pub use egress::{resolve_egress, DEFAULT_EGRESS, EGRESS_ENV};
pub use schema::ClientConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryDefaults;
pub use schema::TimeoutConfig;
