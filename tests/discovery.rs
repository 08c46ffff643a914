// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for platform discovery.

mod common;

use std::sync::Arc;

use common::{Reply, ScriptedClient, puck, vent};
use flair_bridge::accessory::{AccessoryId, ServiceKind};
use flair_bridge::device::{DeviceKind, parse_vents};
use flair_bridge::event::BridgeEvent;
use flair_bridge::platform::{FlairPlatform, PlatformConfig};
use flair_bridge::registry::{AccessoryOrigin, AccessoryRegistry, MemoryRegistry};
use flair_bridge::types::Percent;
use flair_bridge::{CommandOutcome, Error};

type Platform = FlairPlatform<MemoryRegistry, ScriptedClient>;

fn client() -> ScriptedClient {
    ScriptedClient::new()
        .with_pucks(vec![puck("p1", "Bedroom", "PK-7", 21.5, 48.0)])
        .with_vents(vec![
            vent("v1", "Living Room Vent", 42),
            vent("v2", "Office Vent", 0),
        ])
}

fn platform_with(
    registry: MemoryRegistry,
    client: ScriptedClient,
) -> (Platform, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let platform = FlairPlatform::new(
        PlatformConfig::default(),
        Arc::new(registry),
        Arc::clone(&client),
    )
    .unwrap();
    (platform, client)
}

#[tokio::test]
async fn discover_binds_every_device() {
    let (platform, _) = platform_with(MemoryRegistry::new(), client());
    let mut rx = platform.subscribe();

    let report = platform.discover().await;

    assert!(report.is_clean());
    assert_eq!(report.bound.len(), 3);
    assert!(report.removed.is_empty());
    assert!(
        report
            .bound
            .iter()
            .all(|b| b.origin == AccessoryOrigin::Registered)
    );
    assert_eq!(platform.bound_accessories().len(), 3);

    let registry = platform.registry();
    let p1 = AccessoryId::for_device("p1");
    assert_eq!(registry.display_name(p1).as_deref(), Some("Bedroom"));
    assert_eq!(
        registry.context(p1).unwrap().map(|s| s.kind()),
        Some(DeviceKind::Puck)
    );

    let mut bound_events = 0;
    while let Ok(event) = rx.try_recv() {
        assert!(matches!(event, BridgeEvent::AccessoryBound { .. }));
        bound_events += 1;
    }
    assert_eq!(bound_events, 3);
}

#[tokio::test]
async fn second_pass_reuses_cached_accessories() {
    let (platform, client) = platform_with(MemoryRegistry::new(), client());
    platform.discover().await;

    client.set_vents(Some(vec![
        vent("v1", "Living Room Vent", 60),
        vent("v2", "Office Vent", 0),
    ]));
    let report = platform.discover().await;

    assert!(
        report
            .bound
            .iter()
            .all(|b| b.origin == AccessoryOrigin::Cached)
    );
    let v1 = AccessoryId::for_device("v1");
    let position = platform
        .with_vent(v1, |binding| binding.current_position().unwrap())
        .unwrap();
    assert_eq!(position.value(), 60);

    let coverings = platform
        .registry()
        .services(v1)
        .unwrap()
        .into_iter()
        .filter(|s| s.kind() == ServiceKind::WindowCovering)
        .count();
    assert_eq!(coverings, 1);
}

#[tokio::test]
async fn one_failing_device_does_not_block_others() {
    let registry = MemoryRegistry::with_unsupported([ServiceKind::WindowCovering]);
    let (platform, _) = platform_with(registry, client());
    let mut rx = platform.subscribe();

    let report = platform.discover().await;

    assert_eq!(report.bound.len(), 1);
    assert_eq!(report.bound[0].device_id, "p1");
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().all(|s| s.kind == DeviceKind::Vent));
    assert!(!report.is_clean());

    let failures = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|e| matches!(e, BridgeEvent::BindFailed { .. }))
        .count();
    assert_eq!(failures, 2);
}

#[tokio::test]
async fn vanished_device_is_unregistered() {
    let (platform, client) = platform_with(MemoryRegistry::new(), client());
    platform.discover().await;

    client.set_vents(Some(vec![vent("v1", "Living Room Vent", 42)]));
    let mut rx = platform.subscribe();
    let report = platform.discover().await;

    let v2 = AccessoryId::for_device("v2");
    assert_eq!(report.removed, vec![v2]);
    assert!(!platform.registry().accessory_ids().contains(&v2));
    assert!(matches!(
        platform.set_vent_position(v2, Percent::OPEN),
        Err(Error::NotBound(_))
    ));

    let removed = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|e| matches!(e, BridgeEvent::AccessoryRemoved { .. }))
        .count();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn failed_listing_keeps_existing_accessories() {
    let (platform, client) = platform_with(MemoryRegistry::new(), client());
    platform.discover().await;

    client.set_vents(None);
    let report = platform.discover().await;

    assert_eq!(report.listing_failures.len(), 1);
    assert_eq!(report.listing_failures[0].kind, DeviceKind::Vent);
    assert!(report.removed.is_empty());
    assert_eq!(platform.registry().accessory_ids().len(), 3);
}

#[tokio::test]
async fn disabled_kind_is_pruned() {
    let client = Arc::new(client());
    let registry = Arc::new(MemoryRegistry::new());

    let platform = FlairPlatform::new(
        PlatformConfig::default(),
        Arc::clone(&registry),
        Arc::clone(&client),
    )
    .unwrap();
    platform.discover().await;

    let platform = FlairPlatform::new(
        PlatformConfig::default().with_vents(false),
        Arc::clone(&registry),
        Arc::clone(&client),
    )
    .unwrap();
    let report = platform.discover().await;

    assert_eq!(report.bound.len(), 1);
    assert_eq!(report.removed.len(), 2);
    assert_eq!(
        registry.accessory_ids(),
        vec![AccessoryId::for_device("p1")]
    );
}

#[tokio::test]
async fn stale_cached_accessory_without_context_is_pruned() {
    let registry = MemoryRegistry::new();
    let orphan = AccessoryId::for_device("gone");
    registry.ensure_accessory(orphan, "Old Vent").unwrap();

    let (platform, _) = platform_with(registry, client());
    let report = platform.discover().await;

    assert_eq!(report.removed, vec![orphan]);
}

#[tokio::test]
async fn set_vent_position_routes_to_binding() {
    let (platform, client) = platform_with(MemoryRegistry::new(), client());
    platform.discover().await;
    client.reply(Reply::Confirm);

    let v2 = AccessoryId::for_device("v2");
    let outcome = platform
        .set_vent_position(v2, Percent::new(75).unwrap())
        .unwrap()
        .outcome()
        .await;

    assert!(matches!(outcome, CommandOutcome::Confirmed(p) if p.value() == 75));
    assert_eq!(
        client.commands(),
        vec![("v2".to_string(), Percent::new(75).unwrap())]
    );

    let p1 = AccessoryId::for_device("p1");
    assert!(matches!(
        platform.set_vent_position(p1, Percent::OPEN),
        Err(Error::NotBound(id)) if id == p1
    ));
    assert_eq!(
        platform
            .with_puck(p1, |binding| binding.serial().to_string())
            .unwrap(),
        "PK-7"
    );
}

#[tokio::test]
async fn failed_rebind_drops_previous_bindings() {
    let (platform, client) = platform_with(MemoryRegistry::new(), client());
    platform.discover().await;

    let unnamable = "x".repeat(80);
    client.set_pucks(Some(vec![puck("p1", &unnamable, "PK-7", 21.5, 48.0)]));
    client.set_vents(Some(vec![
        vent("v1", &unnamable, 42),
        vent("v2", "Office Vent", 0),
    ]));
    let report = platform.discover().await;

    assert_eq!(report.skipped.len(), 2);
    assert!(report.removed.is_empty());

    let p1 = AccessoryId::for_device("p1");
    let v1 = AccessoryId::for_device("v1");
    assert!(matches!(
        platform.with_puck(p1, |binding| binding.serial().to_string()),
        Err(Error::NotBound(id)) if id == p1
    ));
    assert!(matches!(
        platform.set_vent_position(v1, Percent::OPEN),
        Err(Error::NotBound(id)) if id == v1
    ));
    assert_eq!(platform.bound_accessories().len(), 1);
}

#[tokio::test]
async fn invalid_vent_in_listing_does_not_block_others() {
    let vents = parse_vents(
        r#"{"data": [
            {"id": "v1", "type": "vents", "attributes": {"name": "Hall", "percent-open": 42}},
            {"id": "v2", "type": "vents", "attributes": {"name": "Den", "percent-open": 140}}
        ]}"#,
    )
    .unwrap();
    let (platform, _) = platform_with(
        MemoryRegistry::new(),
        ScriptedClient::new().with_pucks(Vec::new()).with_vents(vents),
    );

    let report = platform.discover().await;

    assert!(report.listing_failures.is_empty());
    assert_eq!(report.bound.len(), 1);
    assert_eq!(report.bound[0].device_id, "v1");
    let position = platform
        .with_vent(AccessoryId::for_device("v1"), |binding| {
            binding.current_position().unwrap()
        })
        .unwrap();
    assert_eq!(position, Percent::new(42).unwrap());
}

#[test]
fn invalid_config_is_rejected() {
    let result = FlairPlatform::new(
        PlatformConfig::default().with_event_capacity(0),
        Arc::new(MemoryRegistry::new()),
        Arc::new(ScriptedClient::new()),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}
