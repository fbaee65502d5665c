//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Egress must be an absolute http(s) URL with a host
//! - Timeouts must be positive when set
//! - Retriable status codes must be real HTTP status codes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Retry counts are not range-checked; the proxy interprets them

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("egress '{value}' is not a valid URL: {reason}")]
    InvalidEgress { value: String, reason: String },

    #[error("timeouts.{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("retriable status code {0} is outside 100..=599")]
    InvalidStatusCode(u16),
}

/// Check a parsed config, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(egress) = &config.egress {
        if let Err(reason) = check_egress(egress) {
            errors.push(ValidationError::InvalidEgress {
                value: egress.clone(),
                reason,
            });
        }
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("request_secs", config.timeouts.request_secs),
        ("upstream_ms", config.timeouts.upstream_ms),
        ("per_try_ms", config.timeouts.per_try_ms),
    ];
    for (field, value) in timeouts {
        if value == Some(0) {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    for &code in &config.retries.retriable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatusCode(code));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_egress(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
