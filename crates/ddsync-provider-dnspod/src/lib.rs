// # DNSPod Gateway
//
// This crate provides the DNSPod implementation of the ddsync `DnsGateway`
// trait.
//
// ## API Reference
//
// DNSPod record API (form-encoded POST, JSON responses):
// - List records:  POST https://dnsapi.cn/Record.List
// - Create record: POST https://dnsapi.cn/Record.Create
// - Modify record: POST https://dnsapi.cn/Record.Modify
//
// Every call carries `login_token` (secret ID and key joined by a comma),
// `format=json`, `lang=en` and `error_on_empty=no`. Responses carry a
// `status.code` field where `"1"` means success; `Record.List` reports an
// empty zone listing as code `"10"`, which this gateway maps to "no record"
// rather than a failure.
//
// ## Responsibility boundaries
//
// The gateway is a thin, stateless wrapper: one API call per operation, no
// retries, no caching, no decisions about whether a write is needed. All of
// that is owned by `SyncEngine`. Records are written on the provider's
// default routing line.
//
// ## Security
//
// The login token never appears in logs; the `Debug` implementation redacts
// it.

use async_trait::async_trait;
use ddsync_core::config::Credentials;
use ddsync_core::traits::{DnsGateway, RecordHandle};
use ddsync_core::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// DNSPod record API base URL
const DNSPOD_API_BASE: &str = "https://dnsapi.cn";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider default routing line
const DEFAULT_RECORD_LINE: &str = "默认";

/// Status block common to every DNSPod response
#[derive(Debug, Deserialize)]
struct ApiStatus {
    code: String,
    message: String,
}

impl ApiStatus {
    /// `"1"` is success; `Record.List` uses `"10"` for an empty listing
    fn is_success(&self) -> bool {
        self.code == "1"
    }

    fn is_empty_listing(&self) -> bool {
        self.code == "10"
    }
}

/// DNSPod record identifiers arrive as strings or numbers depending on the
/// endpoint; normalize both to a string
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// One entry of a `Record.List` response
#[derive(Debug, Deserialize)]
struct RecordEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    value: String,
}

/// `Record.List` response
#[derive(Debug, Deserialize)]
struct RecordListResponse {
    status: ApiStatus,
    #[serde(default)]
    records: Vec<RecordEntry>,
}

/// Record block of a `Record.Create` / `Record.Modify` response
#[derive(Debug, Deserialize)]
struct WrittenRecord {
    #[serde(deserialize_with = "id_string")]
    id: String,
}

/// `Record.Create` / `Record.Modify` response
#[derive(Debug, Deserialize)]
struct RecordWriteResponse {
    status: ApiStatus,
    record: Option<WrittenRecord>,
}

/// Select the first listed entry whose name and type match exactly
///
/// When duplicates exist the first match is authoritative and the rest are
/// ignored.
fn first_match(records: Vec<RecordEntry>, host: &str, record_type: &str) -> Option<RecordHandle> {
    records
        .into_iter()
        .find(|r| r.name == host && r.record_type == record_type)
        .map(|r| RecordHandle {
            id: r.id,
            value: r.value,
        })
}

/// DNSPod gateway
///
/// Stateless and single-shot; safe to share across async tasks.
pub struct DnspodGateway {
    /// `"<secret_id>,<secret_key>"` — never log this value
    login_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the login token
impl std::fmt::Debug for DnspodGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnspodGateway")
            .field("login_token", &"<REDACTED>")
            .finish()
    }
}

impl DnspodGateway {
    /// Create a new DNSPod gateway from the credential pair
    ///
    /// Fails with a configuration error when either half of the pair is
    /// empty; the daemon treats that as fatal before any round runs.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        credentials.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            login_token: format!("{},{}", credentials.secret_id, credentials.secret_key),
            client,
        })
    }

    /// Parameters common to every API action
    fn base_params(&self, zone: &str) -> Vec<(&'static str, String)> {
        vec![
            ("login_token", self.login_token.clone()),
            ("format", "json".to_string()),
            ("error_on_empty", "no".to_string()),
            ("lang", "en".to_string()),
            ("domain", zone.to_string()),
        ]
    }

    /// Issue one form-encoded POST and decode the JSON response
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{DNSPOD_API_BASE}/{action}");
        let response = self
            .client
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| Error::provider("dnspod", format!("{action} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "dnspod",
                format!("{action} returned HTTP {}", response.status()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::provider("dnspod", format!("{action} response unparsable: {e}")))
    }
}

#[async_trait]
impl DnsGateway for DnspodGateway {
    async fn find_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
    ) -> Result<Option<RecordHandle>> {
        let mut params = self.base_params(zone);
        params.push(("sub_domain", host.to_string()));
        params.push(("record_type", record_type.to_string()));

        let response: RecordListResponse = self.post("Record.List", &params).await?;

        if response.status.is_empty_listing() {
            return Ok(None);
        }
        if !response.status.is_success() {
            return Err(Error::provider(
                "dnspod",
                format!(
                    "Record.List failed: {} ({})",
                    response.status.message, response.status.code
                ),
            ));
        }

        Ok(first_match(response.records, host, record_type))
    }

    async fn create_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<String> {
        let mut params = self.base_params(zone);
        params.push(("sub_domain", host.to_string()));
        params.push(("record_type", record_type.to_string()));
        params.push(("record_line", DEFAULT_RECORD_LINE.to_string()));
        params.push(("value", value.to_string()));
        params.push(("ttl", ttl_secs.to_string()));

        let response: RecordWriteResponse = self.post("Record.Create", &params).await?;

        if !response.status.is_success() {
            return Err(Error::provider(
                "dnspod",
                format!(
                    "Record.Create failed: {} ({})",
                    response.status.message, response.status.code
                ),
            ));
        }

        let id = response
            .record
            .map(|r| r.id)
            .ok_or_else(|| Error::provider("dnspod", "Record.Create response missing record id"))?;

        tracing::info!("created {record_type} record {host}.{zone} -> {value} (id {id})");
        Ok(id)
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        host: &str,
        record_type: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<String> {
        let mut params = self.base_params(zone);
        params.push(("record_id", record_id.to_string()));
        params.push(("sub_domain", host.to_string()));
        params.push(("record_type", record_type.to_string()));
        params.push(("record_line", DEFAULT_RECORD_LINE.to_string()));
        params.push(("value", value.to_string()));
        params.push(("ttl", ttl_secs.to_string()));

        let response: RecordWriteResponse = self.post("Record.Modify", &params).await?;

        if !response.status.is_success() {
            return Err(Error::provider(
                "dnspod",
                format!(
                    "Record.Modify failed: {} ({})",
                    response.status.message, response.status.code
                ),
            ));
        }

        let id = response.record.map(|r| r.id).unwrap_or_else(|| record_id.to_string());
        tracing::info!("updated {record_type} record {host}.{zone} -> {value} (id {id})");
        Ok(id)
    }

    fn gateway_name(&self) -> &'static str {
        "dnspod"
    }
}
