// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Flair platform: discovery, binding and pruning of accessories.
//!
//! [`FlairPlatform::discover`] lists devices through the [`FlairApi`],
//! maps each one to a stable [`AccessoryId`], binds it, and unregisters
//! accessories whose device is gone. A device that fails to bind is
//! skipped and reported; it never prevents the others from binding.

mod config;

pub use config::PlatformConfig;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::accessory::AccessoryId;
use crate::binding::{CommandTicket, PuckBinding, VentBinding};
use crate::client::FlairApi;
use crate::device::{DeviceKind, DeviceSnapshot};
use crate::error::{Error, Result};
use crate::event::{BridgeEvent, EventBus};
use crate::registry::{AccessoryOrigin, AccessoryRegistry};
use crate::types::Percent;

/// A device bound during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDevice {
    /// The accessory the device is exposed as.
    pub accessory: AccessoryId,
    /// Flair resource id.
    pub device_id: String,
    /// Kind of the device.
    pub kind: DeviceKind,
    /// Whether the accessory came from the host cache.
    pub origin: AccessoryOrigin,
}

/// A device skipped during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDevice {
    /// The accessory the device maps to.
    pub accessory: AccessoryId,
    /// Flair resource id.
    pub device_id: String,
    /// Kind of the device.
    pub kind: DeviceKind,
    /// Why binding failed.
    pub error: String,
}

/// A device listing that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFailure {
    /// Kind of the listing.
    pub kind: DeviceKind,
    /// Why the listing failed.
    pub error: String,
}

/// Result of one discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryReport {
    /// Devices bound to accessories.
    pub bound: Vec<BoundDevice>,
    /// Devices that failed to bind.
    pub skipped: Vec<SkippedDevice>,
    /// Accessories unregistered because their device is gone.
    pub removed: Vec<AccessoryId>,
    /// Listings that failed; their accessories were left in place.
    pub listing_failures: Vec<ListingFailure>,
    /// When the pass finished.
    pub completed_at: DateTime<Utc>,
}

impl DiscoveryReport {
    /// Returns `true` if every listing succeeded and every device bound.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.listing_failures.is_empty()
    }
}

/// Exposes a Flair structure as accessories of a host registry.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use flair_bridge::client::FlairApi;
/// use flair_bridge::platform::{FlairPlatform, PlatformConfig};
/// use flair_bridge::registry::MemoryRegistry;
///
/// async fn run<C: FlairApi + 'static>(client: C) -> flair_bridge::Result<()> {
///     let platform = FlairPlatform::new(
///         PlatformConfig::default(),
///         Arc::new(MemoryRegistry::new()),
///         Arc::new(client),
///     )?;
///
///     let mut events = platform.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("{event:?}");
///         }
///     });
///
///     let report = platform.discover().await;
///     println!("bound {} devices", report.bound.len());
///     Ok(())
/// }
/// ```
pub struct FlairPlatform<R, C> {
    config: PlatformConfig,
    registry: Arc<R>,
    client: Arc<C>,
    events: EventBus,
    pucks: RwLock<HashMap<AccessoryId, PuckBinding>>,
    vents: RwLock<HashMap<AccessoryId, VentBinding<R, C>>>,
}

impl<R, C> FlairPlatform<R, C>
where
    R: AccessoryRegistry + 'static,
    C: FlairApi + 'static,
{
    /// Creates a platform over a host registry and an API client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: PlatformConfig, registry: Arc<R>, client: Arc<C>) -> Result<Self> {
        config.validate()?;
        let events = EventBus::with_capacity(config.event_capacity);
        Ok(Self {
            config,
            registry,
            client,
            events,
            pucks: RwLock::new(HashMap::new()),
            vents: RwLock::new(HashMap::new()),
        })
    }

    /// Runs one discovery pass.
    ///
    /// Each enabled listing is fetched independently. Every listed device
    /// is bound to its accessory, reusing cached accessories. Accessories
    /// whose device is no longer listed, or whose kind is disabled, are
    /// unregistered. Accessories of a kind whose listing failed are left
    /// untouched.
    pub async fn discover(&self) -> DiscoveryReport {
        let mut report = DiscoveryReport {
            bound: Vec::new(),
            skipped: Vec::new(),
            removed: Vec::new(),
            listing_failures: Vec::new(),
            completed_at: Utc::now(),
        };

        let mut snapshots: Vec<DeviceSnapshot> = Vec::new();
        if self.config.pucks {
            match self.client.list_pucks().await {
                Ok(pucks) => snapshots.extend(pucks.into_iter().map(DeviceSnapshot::from)),
                Err(e) => report.listing_failures.push(listing_failed(DeviceKind::Puck, &e)),
            }
        }
        if self.config.vents {
            match self.client.list_vents().await {
                Ok(vents) => snapshots.extend(vents.into_iter().map(DeviceSnapshot::from)),
                Err(e) => report.listing_failures.push(listing_failed(DeviceKind::Vent, &e)),
            }
        }

        let mut listed = HashSet::new();
        for snapshot in &snapshots {
            let accessory = AccessoryId::for_device(snapshot.id());
            listed.insert(accessory);

            match self.bind_device(accessory, snapshot) {
                Ok(origin) => {
                    self.events.publish(BridgeEvent::AccessoryBound {
                        accessory,
                        device_id: snapshot.id().to_string(),
                        kind: snapshot.kind(),
                        origin,
                    });
                    report.bound.push(BoundDevice {
                        accessory,
                        device_id: snapshot.id().to_string(),
                        kind: snapshot.kind(),
                        origin,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        device_id = snapshot.id(),
                        kind = %snapshot.kind(),
                        error = %e,
                        "Skipping device"
                    );
                    self.events.publish(BridgeEvent::BindFailed {
                        accessory,
                        device_id: snapshot.id().to_string(),
                        error: e.to_string(),
                    });
                    report.skipped.push(SkippedDevice {
                        accessory,
                        device_id: snapshot.id().to_string(),
                        kind: snapshot.kind(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let failed: HashSet<DeviceKind> =
            report.listing_failures.iter().map(|f| f.kind).collect();
        report.removed = self.prune(&listed, &failed);
        report.completed_at = Utc::now();

        tracing::info!(
            platform = %self.config.name,
            bound = report.bound.len(),
            skipped = report.skipped.len(),
            removed = report.removed.len(),
            "Discovery finished"
        );
        report
    }

    /// Routes a controller SET on a vent's `TargetPosition`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotBound` if the accessory is not a bound vent, or
    /// the error of [`VentBinding::set_target_position`], including
    /// `Error::NoRuntime` outside a tokio runtime.
    pub fn set_vent_position(
        &self,
        accessory: AccessoryId,
        target: Percent,
    ) -> Result<CommandTicket> {
        self.vents
            .read()
            .get(&accessory)
            .ok_or(Error::NotBound(accessory))?
            .set_target_position(target)
    }

    fn bind_device(
        &self,
        accessory: AccessoryId,
        snapshot: &DeviceSnapshot,
    ) -> Result<AccessoryOrigin> {
        // A fresh snapshot retires the previous binding, even if rebinding fails.
        self.pucks.write().remove(&accessory);
        if let Some(previous) = self.vents.write().remove(&accessory) {
            previous.cancel_pending();
        }

        let origin = self.registry.ensure_accessory(accessory, snapshot.name())?;
        self.registry.set_context(accessory, snapshot.clone())?;

        match snapshot {
            DeviceSnapshot::Puck(puck) => {
                let binding = PuckBinding::bind(self.registry.as_ref(), accessory, puck)?;
                self.pucks.write().insert(accessory, binding);
            }
            DeviceSnapshot::Vent(vent) => {
                let binding = VentBinding::bind(
                    Arc::clone(&self.registry),
                    Arc::clone(&self.client),
                    accessory,
                    vent,
                )?
                .with_command_timeout(self.config.command_timeout())
                .with_events(self.events.clone());
                self.vents.write().insert(accessory, binding);
            }
        }

        tracing::debug!(%accessory, device_id = snapshot.id(), ?origin, "Device bound");
        Ok(origin)
    }

    fn prune(
        &self,
        listed: &HashSet<AccessoryId>,
        failed: &HashSet<DeviceKind>,
    ) -> Vec<AccessoryId> {
        let mut removed = Vec::new();
        for accessory in self.registry.accessory_ids() {
            if listed.contains(&accessory) {
                continue;
            }

            let kind = match self.registry.context(accessory) {
                Ok(context) => context.map(|snapshot| snapshot.kind()),
                Err(e) => {
                    tracing::warn!(%accessory, error = %e, "Cannot read accessory context");
                    continue;
                }
            };
            let keep = match kind {
                Some(kind) => self.is_enabled(kind) && failed.contains(&kind),
                // Never bound: only safe to drop after a complete listing.
                None => !failed.is_empty(),
            };
            if keep {
                continue;
            }

            self.pucks.write().remove(&accessory);
            if let Some(vent) = self.vents.write().remove(&accessory) {
                vent.cancel_pending();
            }
            match self.registry.unregister_accessory(accessory) {
                Ok(()) => {
                    tracing::info!(%accessory, "Unregistered accessory");
                    self.events.publish(BridgeEvent::removed(accessory));
                    removed.push(accessory);
                }
                Err(e) => tracing::warn!(%accessory, error = %e, "Failed to unregister accessory"),
            }
        }
        removed
    }

    fn is_enabled(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Puck => self.config.pucks,
            DeviceKind::Vent => self.config.vents,
        }
    }
}

impl<R, C> FlairPlatform<R, C> {
    /// Subscribes to bridge events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events.subscribe()
    }

    /// The platform's event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The platform configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// The host registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Accessories currently bound by this platform.
    #[must_use]
    pub fn bound_accessories(&self) -> Vec<AccessoryId> {
        let mut ids: Vec<AccessoryId> = self.pucks.read().keys().copied().collect();
        ids.extend(self.vents.read().keys().copied());
        ids.sort();
        ids
    }

    /// Runs `f` with the vent binding of `accessory`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotBound` if the accessory is not a bound vent.
    pub fn with_vent<T>(
        &self,
        accessory: AccessoryId,
        f: impl FnOnce(&VentBinding<R, C>) -> T,
    ) -> Result<T> {
        self.vents
            .read()
            .get(&accessory)
            .map(f)
            .ok_or(Error::NotBound(accessory))
    }

    /// Runs `f` with the puck binding of `accessory`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotBound` if the accessory is not a bound puck.
    pub fn with_puck<T>(
        &self,
        accessory: AccessoryId,
        f: impl FnOnce(&PuckBinding) -> T,
    ) -> Result<T> {
        self.pucks
            .read()
            .get(&accessory)
            .map(f)
            .ok_or(Error::NotBound(accessory))
    }
}

impl<R, C> fmt::Debug for FlairPlatform<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlairPlatform")
            .field("config", &self.config)
            .field("pucks", &self.pucks.read().len())
            .field("vents", &self.vents.read().len())
            .finish_non_exhaustive()
    }
}

fn listing_failed(kind: DeviceKind, error: &crate::error::RemoteError) -> ListingFailure {
    tracing::warn!(%kind, %error, "Device listing failed");
    ListingFailure {
        kind,
        error: error.to_string(),
    }
}
