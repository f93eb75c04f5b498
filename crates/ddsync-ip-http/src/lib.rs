// # HTTP IP Resolver
//
// This crate provides the HTTP-based public-IP resolver for the ddsync
// system.
//
// ## Architecture
//
// Each address family has a fixed, prioritized list of "what is my IP"
// endpoints, every one of which returns the caller's public address as the
// entire response body. `resolve` walks the list in order with a bounded
// per-request timeout and returns the first response that parses as a
// literal address of the requested family. There is no caching and no
// retry beyond falling through to the next endpoint: a fresh call always
// starts again from endpoint #1.
//
// Endpoint failures (transport error, bad status, malformed body, address
// of the wrong family) are logged per endpoint; only once the whole list is
// exhausted does the call fail.

use ddsync_core::traits::{AddressFamily, IpResolver};
use ddsync_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Per-request timeout for IP endpoint queries
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(8);

/// Public IPv4 endpoints, in priority order
const DEFAULT_IPV4_ENDPOINTS: &[&str] = &[
    "https://api.ipify.org",
    "https://ipv4.icanhazip.com",
    "https://v4.ident.me",
    "https://ip.3322.net",
];

/// Public IPv6 endpoints, in priority order
const DEFAULT_IPV6_ENDPOINTS: &[&str] = &[
    "https://api64.ipify.org",
    "https://ipv6.icanhazip.com",
    "https://v6.ident.me",
];

/// HTTP-based public-IP resolver
pub struct HttpIpResolver {
    /// IPv4 endpoint list, in priority order
    ipv4_endpoints: Vec<String>,

    /// IPv6 endpoint list, in priority order
    ipv6_endpoints: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpIpResolver {
    /// Create a resolver with the default endpoint lists
    pub fn new() -> Self {
        Self::with_endpoints(
            DEFAULT_IPV4_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_IPV6_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Create a resolver with custom endpoint lists
    pub fn with_endpoints(ipv4_endpoints: Vec<String>, ipv6_endpoints: Vec<String>) -> Self {
        Self {
            ipv4_endpoints,
            ipv6_endpoints,
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    fn endpoints(&self, family: AddressFamily) -> &[String] {
        match family {
            AddressFamily::V4 => &self.ipv4_endpoints,
            AddressFamily::V6 => &self.ipv6_endpoints,
        }
    }

    /// Fetch one endpoint's body, trimmed
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("{url} returned {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("reading body from {url} failed: {e}")))?;

        Ok(body.trim().to_string())
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr> {
        let endpoints = self.endpoints(family);

        for url in endpoints {
            match self.fetch(url).await {
                Ok(body) => match body.parse::<IpAddr>() {
                    Ok(ip) if family.matches(ip) => {
                        tracing::info!("resolved {family} address {ip} via {url}");
                        return Ok(ip);
                    }
                    Ok(ip) => {
                        tracing::warn!("{url} returned a non-{family} address: {ip}");
                    }
                    Err(_) => {
                        tracing::warn!("{url} returned an unparsable body: {body:?}");
                    }
                },
                Err(e) => {
                    tracing::warn!("{family} lookup via {url} failed: {e}");
                }
            }
        }

        Err(Error::resolution(format!(
            "all {} {family} endpoints failed",
            endpoints.len()
        )))
    }
}
