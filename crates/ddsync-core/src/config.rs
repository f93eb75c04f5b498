//! Configuration types for the ddsync system
//!
//! Configuration is built once at startup (the daemon reads it from the
//! environment) and passed by reference into the engine. Nothing in this
//! crate reads ambient global state.

use serde::{Deserialize, Serialize};

/// Default TTL (seconds) for created and updated records
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Default interval (seconds) between reconciliation rounds
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Provider credential pair
///
/// Both halves are required; an empty half fails validation and gateway
/// construction. The `Debug` impl never prints the secret key.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Provider secret ID
    pub secret_id: String,
    /// Provider secret key
    pub secret_key: String,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Validate that both halves are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.secret_id.is_empty() || self.secret_key.is_empty() {
            return Err(crate::Error::config(
                "provider secret ID and secret key are required",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .finish()
    }
}

/// Main ddsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Provider credential pair
    pub credentials: Credentials,

    /// Fully-qualified domains to keep in sync
    pub domains: Vec<String>,

    /// Whether IPv4 (A record) handling is enabled
    pub enable_ipv4: bool,

    /// Whether IPv6 (AAAA record) handling is enabled
    pub enable_ipv6: bool,

    /// TTL (seconds) applied to created/updated records
    pub ttl_secs: u64,

    /// Interval (seconds) between reconciliation rounds
    pub interval_secs: u64,
}

impl SyncConfig {
    /// Create a configuration with default toggles and timings
    pub fn new(credentials: Credentials, domains: Vec<String>) -> Self {
        Self {
            credentials,
            domains,
            enable_ipv4: true,
            enable_ipv6: true,
            ttl_secs: DEFAULT_TTL_SECS,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }

    /// Validate the configuration
    ///
    /// Missing credentials are the only fatal condition. An empty domain
    /// list or disabled families degrade to per-round no-ops with a
    /// diagnostic instead.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()
    }

    /// Parse a domain list from its configured string forms
    ///
    /// `domains` is the comma-separated multi-domain value; `single` is the
    /// legacy single-domain fallback, consulted only when `domains` is empty.
    pub fn parse_domains(domains: &str, single: &str) -> Vec<String> {
        let trimmed = domains.trim();
        if !trimmed.is_empty() {
            return trimmed
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }
        let single = single.trim();
        if single.is_empty() {
            Vec::new()
        } else {
            vec![single.to_string()]
        }
    }
}
