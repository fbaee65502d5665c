//! Egress proxy address resolution.

/// Environment variable holding the sidecar egress base address.
pub const EGRESS_ENV: &str = "CLIENT_EGRESS";

/// Used when neither an override nor the environment supplies an address.
pub const DEFAULT_EGRESS: &str = "http://envoy:9000";

/// Resolve the egress base address for one URI build.
///
/// A non-empty `override_addr` wins, then a non-empty `CLIENT_EGRESS`,
/// then [`DEFAULT_EGRESS`].
pub fn resolve_egress(override_addr: Option<&str>) -> String {
    let from_env = std::env::var(EGRESS_ENV).ok();
    select_egress(override_addr, from_env.as_deref())
}

fn select_egress(override_addr: Option<&str>, from_env: Option<&str>) -> String {
    [override_addr, from_env]
        .into_iter()
        .flatten()
        .find(|addr| !addr.is_empty())
        .unwrap_or(DEFAULT_EGRESS)
        .to_string()
}
