//! Test doubles and common utilities for reconciliation contract tests
//!
//! The mocks share their counters and record tables through Arcs, so a test
//! can hand a clone to the engine and keep one for assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use ddsync_core::config::{Credentials, SyncConfig};
use ddsync_core::engine::EngineEvent;
use ddsync_core::error::{Error, Result};
use ddsync_core::traits::{AddressFamily, DnsGateway, IpResolver, RecordHandle};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A resolver that returns a scripted outcome per family and counts calls
#[derive(Clone)]
pub struct ScriptedResolver {
    ipv4: Option<IpAddr>,
    ipv6: Option<IpAddr>,
    pub v4_calls: Arc<AtomicUsize>,
    pub v6_calls: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// `None` scripts a resolution failure for that family
    pub fn new(ipv4: Option<&str>, ipv6: Option<&str>) -> Self {
        Self {
            ipv4: ipv4.map(|s| s.parse().expect("valid IPv4 literal")),
            ipv6: ipv6.map(|s| s.parse().expect("valid IPv6 literal")),
            v4_calls: Arc::new(AtomicUsize::new(0)),
            v6_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn v4_call_count(&self) -> usize {
        self.v4_calls.load(Ordering::SeqCst)
    }

    pub fn v6_call_count(&self) -> usize {
        self.v6_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for ScriptedResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<IpAddr> {
        let (scripted, counter) = match family {
            AddressFamily::V4 => (self.ipv4, &self.v4_calls),
            AddressFamily::V6 => (self.ipv6, &self.v6_calls),
        };
        counter.fetch_add(1, Ordering::SeqCst);
        scripted.ok_or_else(|| Error::resolution(format!("all {family} endpoints failed")))
    }
}

/// Record key: (zone, host, record type)
type RecordKey = (String, String, String);

/// An in-memory gateway that tracks every call
#[derive(Clone, Default)]
pub struct MockGateway {
    records: Arc<Mutex<HashMap<RecordKey, RecordHandle>>>,
    failing_zones: Arc<Mutex<HashSet<String>>>,
    next_id: Arc<AtomicUsize>,
    pub find_calls: Arc<AtomicUsize>,
    pub create_calls: Arc<AtomicUsize>,
    pub update_calls: Arc<AtomicUsize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing provider-side record
    pub fn insert(&self, zone: &str, host: &str, record_type: &str, id: &str, value: &str) {
        self.records.lock().unwrap().insert(
            (zone.to_string(), host.to_string(), record_type.to_string()),
            RecordHandle {
                id: id.to_string(),
                value: value.to_string(),
            },
        );
    }

    /// Make every call touching `zone` fail with a provider error
    pub fn fail_zone(&self, zone: &str) {
        self.failing_zones.lock().unwrap().insert(zone.to_string());
    }

    /// Currently published value for a record scope, if any
    pub fn value_of(&self, zone: &str, host: &str, record_type: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&(zone.to_string(), host.to_string(), record_type.to_string()))
            .map(|r| r.value.clone())
    }

    pub fn find_call_count(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Total gateway writes issued
    pub fn write_call_count(&self) -> usize {
        self.create_call_count() + self.update_call_count()
    }

    fn check_zone(&self, zone: &str) -> Result<()> {
        if self.failing_zones.lock().unwrap().contains(zone) {
            return Err(Error::provider("mock", format!("scripted failure for zone {zone}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DnsGateway for MockGateway {
    async fn find_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
    ) -> Result<Option<RecordHandle>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.check_zone(zone)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(zone.to_string(), host.to_string(), record_type.to_string()))
            .cloned())
    }

    async fn create_record(
        &self,
        zone: &str,
        host: &str,
        record_type: &str,
        value: &str,
        _ttl_secs: u64,
    ) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_zone(zone)?;
        let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.insert(zone, host, record_type, &id, value);
        Ok(id)
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        host: &str,
        record_type: &str,
        value: &str,
        _ttl_secs: u64,
    ) -> Result<String> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_zone(zone)?;
        let mut records = self.records.lock().unwrap();
        let key = (zone.to_string(), host.to_string(), record_type.to_string());
        match records.get_mut(&key) {
            Some(record) if record.id == record_id => {
                record.value = value.to_string();
                Ok(record_id.to_string())
            }
            _ => Err(Error::provider(
                "mock",
                format!("no record {record_id} in zone {zone}"),
            )),
        }
    }

    fn gateway_name(&self) -> &'static str {
        "mock"
    }
}

/// Configuration with test credentials for the given domains
pub fn test_config(domains: &[&str]) -> SyncConfig {
    SyncConfig::new(
        Credentials::new("test_id", "test_key"),
        domains.iter().map(|d| d.to_string()).collect(),
    )
}

/// Drain all events buffered on the receiver
pub fn drain_events(rx: &mut mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
