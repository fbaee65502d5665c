//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RequestBuilder produces:
//!     → tracing events (target resolution, transport outcome)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr) when the binary runs
//!     → whatever recorder/subscriber the embedding service installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder on its own
//! - Metric updates go through the `metrics` facade and are no-ops without a recorder

pub mod logging;
pub mod metrics;
