// # IP Resolver Trait
//
// Defines the interface for discovering the machine's current public IP
// address for a given address family.
//
// ## Implementations
//
// - HTTP endpoint fallback chain: `ddsync-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddsync_core::{AddressFamily, IpResolver};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//     let ip = resolver.resolve(AddressFamily::V4).await?;
//     println!("public IPv4: {ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// IP address family handled by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4 (A records)
    V4,
    /// IPv6 (AAAA records)
    V6,
}

impl AddressFamily {
    /// The provider record-type token for this family
    pub fn record_type(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "A",
            AddressFamily::V6 => "AAAA",
        }
    }

    /// Whether the given address belongs to this family
    pub fn matches(&self, ip: IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Trait for public-IP resolver implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Contract
///
/// - `resolve` returns a syntactically valid address of the requested
///   family, or `Error::Resolution` once every source is exhausted
/// - No caching: every call re-derives the address from its sources
/// - No retry beyond falling through to the next configured source;
///   scheduling of further attempts is owned by [`crate::SyncEngine`]
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP for the given family
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr, crate::Error>;
}
