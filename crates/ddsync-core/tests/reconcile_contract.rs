//! Contract Test: Reconcile Decision Table
//!
//! Verifies the per-record decision procedure against provider state:
//! - Missing record → exactly one create, no update
//! - Stale record → exactly one update, no create
//! - Correct record → zero writes (steady state)
//! - Repeated rounds with an unchanged IP → exactly one write in total

mod common;

use common::*;
use ddsync_core::SyncEngine;
use ddsync_core::engine::EngineEvent;
use ddsync_core::traits::AddressFamily;

#[tokio::test]
async fn missing_record_is_created() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), None);
    let gateway = MockGateway::new();

    let mut config = test_config(&["home.example.com"]);
    config.enable_ipv6 = false;

    let (engine, mut event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    engine.run_round().await;

    assert_eq!(gateway.create_call_count(), 1, "expected exactly one create");
    assert_eq!(gateway.update_call_count(), 0, "create must not be an update");
    assert_eq!(
        gateway.value_of("example.com", "home", "A").as_deref(),
        Some("203.0.113.7")
    );

    let events = drain_events(&mut event_rx);
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::RecordCreated { domain, family: AddressFamily::V4, .. } if domain == "home.example.com"
    )));
}

#[tokio::test]
async fn stale_record_is_updated_not_recreated() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), None);
    let gateway = MockGateway::new();
    gateway.insert("example.com", "home", "A", "rec-1", "198.51.100.1");

    let mut config = test_config(&["home.example.com"]);
    config.enable_ipv6 = false;

    let (engine, mut event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    engine.run_round().await;

    assert_eq!(gateway.update_call_count(), 1, "expected exactly one update");
    assert_eq!(gateway.create_call_count(), 0, "update must not be a create");
    assert_eq!(
        gateway.value_of("example.com", "home", "A").as_deref(),
        Some("203.0.113.7")
    );

    let events = drain_events(&mut event_rx);
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::RecordUpdated { previous, .. } if previous == "198.51.100.1"
    )));
}

#[tokio::test]
async fn correct_record_issues_no_write() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), None);
    let gateway = MockGateway::new();
    gateway.insert("example.com", "home", "A", "rec-1", "203.0.113.7");

    let mut config = test_config(&["home.example.com"]);
    config.enable_ipv6 = false;

    let (engine, mut event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    engine.run_round().await;

    assert_eq!(gateway.find_call_count(), 1);
    assert_eq!(gateway.write_call_count(), 0, "steady state must not write");

    let events = drain_events(&mut event_rx);
    assert!(events.iter().any(|e| matches!(e, EngineEvent::RecordUnchanged { .. })));
}

#[tokio::test]
async fn unchanged_ip_across_rounds_writes_exactly_once() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), None);
    let gateway = MockGateway::new();

    let mut config = test_config(&["home.example.com"]);
    config.enable_ipv6 = false;

    let (engine, _event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    // First round creates; second round finds the record already correct
    engine.run_round().await;
    engine.run_round().await;

    assert_eq!(gateway.create_call_count(), 1);
    assert_eq!(gateway.update_call_count(), 0);
    assert_eq!(gateway.find_call_count(), 2);
}

#[tokio::test]
async fn families_are_reconciled_independently() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), Some("2001:db8::1"));
    let gateway = MockGateway::new();
    // Stale A record, no AAAA record at all
    gateway.insert("example.com", "home", "A", "rec-1", "198.51.100.1");

    let config = test_config(&["home.example.com"]);

    let (engine, _event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    engine.run_round().await;

    assert_eq!(gateway.update_call_count(), 1, "A record updated");
    assert_eq!(gateway.create_call_count(), 1, "AAAA record created");
    assert_eq!(
        gateway.value_of("example.com", "home", "A").as_deref(),
        Some("203.0.113.7")
    );
    assert_eq!(
        gateway.value_of("example.com", "home", "AAAA").as_deref(),
        Some("2001:db8::1")
    );
}

#[tokio::test]
async fn apex_domain_maps_to_at_host() {
    let resolver = ScriptedResolver::new(Some("203.0.113.7"), None);
    let gateway = MockGateway::new();

    let mut config = test_config(&["example.com"]);
    config.enable_ipv6 = false;

    let (engine, _event_rx) =
        SyncEngine::new(Box::new(resolver), Box::new(gateway.clone()), config)
            .expect("engine construction succeeds");

    engine.run_round().await;

    assert_eq!(
        gateway.value_of("example.com", "@", "A").as_deref(),
        Some("203.0.113.7")
    );
}
