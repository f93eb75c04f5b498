// # DNS Gateway Trait
//
// Defines the interface for querying and writing provider DNS records.
//
// ## Implementations
//
// - DNSPod: `ddsync-provider-dnspod` crate
//
// ## Responsibility boundaries
//
// Gateways are thin wrappers over the provider's record API. They translate
// transport and API failures into `Error::Provider` and hide the wire format
// behind typed operations. They do NOT decide whether a write is needed:
// the create-or-update-or-skip decision is owned by `SyncEngine`. Gateways
// also do not retry; a failed call is reported once and the engine moves on.
//
// "Record not found" is a normal outcome of `find_record` (`Ok(None)`),
// never an error.

use async_trait::async_trait;

/// A provider-side DNS record: its opaque identifier and current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    /// Opaque provider record identifier
    pub id: String,
    /// Currently published value (the IP, as the provider returns it)
    pub value: String,
}

/// Trait for DNS provider gateway implementations
///
/// All operations are scoped to (zone, host label, record type) per the
/// provider's record model; see [`crate::domain::split_domain`] for how a
/// FQDN maps onto that scope.
///
/// # Duplicate records
///
/// At most one record per (zone, host, type) is managed. If the provider
/// listing contains more than one matching record, the first one returned is
/// treated as authoritative and the rest are ignored.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsGateway: Send + Sync {
    /// Find the first record matching (zone, host, type)
    ///
    /// Returns `Ok(None)` when no matching record exists.
    async fn find_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
    ) -> Result<Option<RecordHandle>, crate::Error>;

    /// Create a record with the given value and TTL, returning its ID
    async fn create_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<String, crate::Error>;

    /// Update an existing record's value, returning its ID
    ///
    /// Setting the same value again is a legal no-op at the provider level,
    /// though the engine avoids issuing it.
    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        host: &str,
        record_type: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<String, crate::Error>;

    /// Get the gateway name (for logging/debugging)
    fn gateway_name(&self) -> &'static str;
}
