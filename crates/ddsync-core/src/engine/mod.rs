//! Core sync engine
//!
//! The SyncEngine is responsible for:
//! - Resolving the current public IP once per family per round
//! - Deciding create / update / skip against the provider's record state
//! - Driving one full round across all configured domains and families
//! - Scheduling rounds forever at a fixed interval
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   resolve (once per family per round)
//! │ IpResolver  │◄──────────────┐
//! └─────────────┘               │
//!                        ┌──────────────┐
//!                        │  SyncEngine  │──── EngineEvent ───► (monitoring)
//!                        └──────────────┘
//!                               │ per (domain, family):
//!                               │ split → find → create/update/skip
//!                               ▼
//!                        ┌──────────────┐
//!                        │  DnsGateway  │
//!                        └──────────────┘
//! ```
//!
//! ## Round Flow
//!
//! 1. Refuse the round when no domains are configured or both families are
//!    disabled (diagnostic only)
//! 2. Resolve each enabled family's public IP exactly once
//! 3. Abandon the round when every enabled family failed to resolve
//! 4. For each domain and enabled family, reconcile the provider record
//!    against the resolved IP; failures stay scoped to that pair

use crate::config::SyncConfig;
use crate::domain::split_domain;
use crate::error::Result;
use crate::traits::{AddressFamily, DnsGateway, IpResolver, RecordHandle};
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the engine event channel; events are dropped when full
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the SyncEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A round started reconciling domains
    RoundStarted {
        domains: usize,
    },

    /// A round was skipped before any network work
    RoundSkipped {
        reason: String,
    },

    /// No enabled family could be resolved; the round was abandoned
    RoundAbandoned,

    /// A family's public IP could not be resolved this round
    FamilyUnresolved {
        family: AddressFamily,
        error: String,
    },

    /// A missing record was created
    RecordCreated {
        domain: String,
        family: AddressFamily,
        ip: IpAddr,
    },

    /// An existing record was updated to a new value
    RecordUpdated {
        domain: String,
        family: AddressFamily,
        previous: String,
        ip: IpAddr,
    },

    /// The record already held the desired value; no write issued
    RecordUnchanged {
        domain: String,
        family: AddressFamily,
        ip: IpAddr,
    },

    /// Reconciling one (domain, family) pair failed
    ReconcileFailed {
        domain: String,
        family: AddressFamily,
        error: String,
    },
}

/// Outcome of applying one reconcile decision
enum Applied {
    Created,
    Updated { previous: String },
    Unchanged,
}

/// Core sync engine
///
/// The engine owns the whole reconciliation flow. It is deliberately
/// stateless across rounds: desired state is re-derived every round from the
/// resolver and the gateway's current record listing, so a restart changes
/// nothing.
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Either drive single rounds with [`SyncEngine::run_round()`] (embedding,
///    tests) or let [`SyncEngine::run()`] schedule them forever
///
/// ## Failure Isolation
///
/// A malformed domain, an unresolved family, or a failing gateway call is
/// logged and emitted as an event; it never aborts sibling domains, the
/// other family, or the scheduler loop. Only invalid configuration
/// (missing credentials) is fatal, and that is rejected at construction.
pub struct SyncEngine {
    /// Public-IP resolver
    resolver: Box<dyn IpResolver>,

    /// Provider gateway
    gateway: Box<dyn DnsGateway>,

    /// Immutable process configuration
    config: SyncConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// Validates the configuration; missing credentials fail construction so
    /// the process never reaches scheduling with an unusable gateway.
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        resolver: Box<dyn IpResolver>,
        gateway: Box<dyn DnsGateway>,
        config: SyncConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            resolver,
            gateway,
            config,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the scheduler loop: one round immediately, then one per interval,
    /// forever
    ///
    /// No jitter and no drift correction; a slow round simply delays the
    /// start of the next sleep. This method never returns; the daemon races
    /// it against a shutdown signal.
    pub async fn run(&self) {
        info!(
            "engine started: {} domain(s), interval {}s, ttl {}s, ipv4={}, ipv6={}",
            self.config.domains.len(),
            self.config.interval_secs,
            self.config.ttl_secs,
            self.config.enable_ipv4,
            self.config.enable_ipv6,
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        self.run_round().await;
        loop {
            tokio::time::sleep(interval).await;
            self.run_round().await;
        }
    }

    /// Drive one full reconciliation round
    pub async fn run_round(&self) {
        if self.config.domains.is_empty() {
            warn!("no domains configured, nothing to reconcile");
            self.emit_event(EngineEvent::RoundSkipped {
                reason: "no domains configured".to_string(),
            });
            return;
        }

        if !self.config.enable_ipv4 && !self.config.enable_ipv6 {
            warn!("both IPv4 and IPv6 are disabled, nothing to reconcile");
            self.emit_event(EngineEvent::RoundSkipped {
                reason: "both address families disabled".to_string(),
            });
            return;
        }

        // One resolver call per enabled family per round; all domains share
        // the result. A failed family is absent for the whole round.
        let ipv4 = if self.config.enable_ipv4 {
            self.resolve_family(AddressFamily::V4).await
        } else {
            None
        };
        let ipv6 = if self.config.enable_ipv6 {
            self.resolve_family(AddressFamily::V6).await
        } else {
            None
        };

        if ipv4.is_none() && ipv6.is_none() {
            warn!("no public IP available for any enabled family, abandoning round");
            self.emit_event(EngineEvent::RoundAbandoned);
            return;
        }

        info!(
            "reconciling {} domain(s): {}",
            self.config.domains.len(),
            self.config.domains.join(", ")
        );
        self.emit_event(EngineEvent::RoundStarted {
            domains: self.config.domains.len(),
        });

        for domain in &self.config.domains {
            if self.config.enable_ipv4 {
                self.reconcile_record(domain, AddressFamily::V4, ipv4).await;
            }
            if self.config.enable_ipv6 {
                self.reconcile_record(domain, AddressFamily::V6, ipv6).await;
            }
        }
    }

    /// Reconcile one (domain, family) pair against the desired IP
    ///
    /// Issues at most one gateway write. An absent `desired` IP (the
    /// family's resolution failed this round) is a silent no-op. All other
    /// failures are logged and emitted, never propagated.
    pub async fn reconcile_record(
        &self,
        domain: &str,
        family: AddressFamily,
        desired: Option<IpAddr>,
    ) {
        let Some(desired) = desired else {
            debug!("{family} unavailable this round, skipping {domain}");
            return;
        };

        let split = match split_domain(domain) {
            Ok(split) => split,
            Err(e) => {
                warn!("skipping {domain}: {e}");
                self.emit_event(EngineEvent::ReconcileFailed {
                    domain: domain.to_string(),
                    family,
                    error: e.to_string(),
                });
                return;
            }
        };

        debug!(
            "reconciling {domain} ({family}): host={}, zone={}",
            split.host, split.zone
        );

        match self.apply(&split.zone, &split.host, family, desired).await {
            Ok(Applied::Created) => {
                info!("{domain} ({family}): created {} record -> {desired}", family.record_type());
                self.emit_event(EngineEvent::RecordCreated {
                    domain: domain.to_string(),
                    family,
                    ip: desired,
                });
            }
            Ok(Applied::Updated { previous }) => {
                info!(
                    "{domain} ({family}): updated {} record {previous} -> {desired}",
                    family.record_type()
                );
                self.emit_event(EngineEvent::RecordUpdated {
                    domain: domain.to_string(),
                    family,
                    previous,
                    ip: desired,
                });
            }
            Ok(Applied::Unchanged) => {
                debug!("{domain} ({family}): record already {desired}, no write");
                self.emit_event(EngineEvent::RecordUnchanged {
                    domain: domain.to_string(),
                    family,
                    ip: desired,
                });
            }
            Err(e) => {
                warn!("{domain} ({family}): reconcile failed: {e}");
                self.emit_event(EngineEvent::ReconcileFailed {
                    domain: domain.to_string(),
                    family,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Apply the create-or-update-or-skip decision for one record scope
    async fn apply(
        &self,
        zone: &str,
        host: &str,
        family: AddressFamily,
        desired: IpAddr,
    ) -> Result<Applied> {
        let record_type = family.record_type();
        let existing = self.gateway.find_record(zone, host, record_type).await?;

        match existing {
            None => {
                self.gateway
                    .create_record(zone, host, record_type, &desired.to_string(), self.config.ttl_secs)
                    .await?;
                Ok(Applied::Created)
            }
            Some(RecordHandle { id, value }) => {
                if record_value_equals(&value, desired) {
                    Ok(Applied::Unchanged)
                } else {
                    self.gateway
                        .update_record(
                            zone,
                            &id,
                            host,
                            record_type,
                            &desired.to_string(),
                            self.config.ttl_secs,
                        )
                        .await?;
                    Ok(Applied::Updated { previous: value })
                }
            }
        }
    }

    /// Resolve one family's public IP, mapping failure to "absent"
    async fn resolve_family(&self, family: AddressFamily) -> Option<IpAddr> {
        match self.resolver.resolve(family).await {
            Ok(ip) => {
                info!("public {family} address: {ip}");
                Some(ip)
            }
            Err(e) => {
                warn!("could not resolve public {family} address, skipping {family} this round: {e}");
                self.emit_event(EngineEvent::FamilyUnresolved {
                    family,
                    error: e.to_string(),
                });
                None
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        // Send event, logging if the channel is full. Dropping is preferable
        // to blocking the round on a slow (or absent) event consumer.
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping event");
        }
    }
}

/// Compare a provider-published record value against the desired IP
///
/// Providers may re-format addresses (IPv6 compression in particular), so the
/// comparison parses the published value when possible and falls back to a
/// trimmed string comparison otherwise.
fn record_value_equals(current: &str, desired: IpAddr) -> bool {
    match current.trim().parse::<IpAddr>() {
        Ok(current) => current == desired,
        Err(_) => current.trim() == desired.to_string(),
    }
}
