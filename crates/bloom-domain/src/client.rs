//! Client identity used to key per-client budgets.

use std::fmt;
use std::net::IpAddr;

/// Identifies the client behind a request.
///
/// Derived from the first entry of a forwarded-for header. Anything that is
/// not an IP address collapses into [`ClientKey::UNKNOWN`], so all such
/// clients share one budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    /// Build from a raw `X-Forwarded-For` value (`client, proxy1, proxy2`).
    pub fn from_forwarded_for(header: Option<&str>) -> Self {
        header
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .and_then(|first| first.parse::<IpAddr>().ok())
            .map(|ip| Self(ip.to_string()))
            .unwrap_or_else(Self::unknown)
    }

    /// Scope this key to one action, e.g. `203.0.113.9:login`.
    pub fn for_purpose(&self, purpose: &str) -> Self {
        Self(format!("{}:{purpose}", self.0))
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
