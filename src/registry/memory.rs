// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process accessory registry.

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::RwLock;

use crate::accessory::{
    AccessoryId, Characteristic, CharacteristicValue, ServiceHandle, ServiceId, ServiceKind,
};
use crate::device::DeviceSnapshot;
use crate::error::RegistryError;

use super::{AccessoryOrigin, AccessoryRegistry};

/// Notifications kept by a [`MemoryRegistry`] unless configured otherwise.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 256;

/// A value pushed to controllers through
/// [`update_characteristic`](AccessoryRegistry::update_characteristic).
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Service whose characteristic changed.
    pub service: ServiceHandle,
    /// The changed characteristic.
    pub characteristic: Characteristic,
    /// The new value.
    pub value: CharacteristicValue,
}

/// Accessory registry that keeps the whole graph in memory.
///
/// Enforces the same contracts a HomeKit host does: one service per
/// `(kind, subtype)` pair, characteristics restricted to their service
/// kind, and values validated against the characteristic format. Hosts
/// lacking a capability can be emulated with
/// [`with_unsupported`](Self::with_unsupported).
///
/// Pushed values are kept in a bounded log, see
/// [`with_notification_capacity`](Self::with_notification_capacity).
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::{AccessoryId, ServiceKind};
/// use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
///
/// let registry = MemoryRegistry::new();
/// let id = AccessoryId::for_device("v1");
/// registry.ensure_accessory(id, "Hall Vent").unwrap();
///
/// let services = registry.services(id).unwrap();
/// assert_eq!(services[0].kind(), ServiceKind::AccessoryInformation);
/// ```
#[derive(Debug)]
pub struct MemoryRegistry {
    inner: RwLock<Inner>,
    unsupported: HashSet<ServiceKind>,
    notification_capacity: usize,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self {
            inner: RwLock::default(),
            unsupported: HashSet::new(),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    accessories: HashMap<AccessoryId, AccessoryRecord>,
    notifications: VecDeque<Notification>,
}

#[derive(Debug)]
struct AccessoryRecord {
    display_name: String,
    context: Option<DeviceSnapshot>,
    services: Vec<ServiceRecord>,
    links: Vec<(ServiceId, ServiceId)>,
}

#[derive(Debug)]
struct ServiceRecord {
    handle: ServiceHandle,
    values: HashMap<Characteristic, CharacteristicValue>,
}

impl ServiceRecord {
    fn new(accessory: AccessoryId, kind: ServiceKind, subtype: Option<&str>) -> Self {
        Self {
            handle: ServiceHandle::new(
                accessory,
                ServiceId::new(),
                kind,
                subtype.map(str::to_string),
            ),
            values: HashMap::new(),
        }
    }
}

impl AccessoryRecord {
    fn service(&self, id: ServiceId) -> Result<&ServiceRecord, RegistryError> {
        self.services
            .iter()
            .find(|s| s.handle.id() == id)
            .ok_or(RegistryError::UnknownService(id))
    }

    fn service_mut(&mut self, id: ServiceId) -> Result<&mut ServiceRecord, RegistryError> {
        self.services
            .iter_mut()
            .find(|s| s.handle.id() == id)
            .ok_or(RegistryError::UnknownService(id))
    }
}

impl Inner {
    fn accessory(&self, id: AccessoryId) -> Result<&AccessoryRecord, RegistryError> {
        self.accessories
            .get(&id)
            .ok_or(RegistryError::UnknownAccessory(id))
    }

    fn accessory_mut(&mut self, id: AccessoryId) -> Result<&mut AccessoryRecord, RegistryError> {
        self.accessories
            .get_mut(&id)
            .ok_or(RegistryError::UnknownAccessory(id))
    }

    fn write(
        &mut self,
        service: &ServiceHandle,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) -> Result<(), RegistryError> {
        if !service.kind().supports(characteristic) {
            return Err(RegistryError::UnsupportedCharacteristic {
                kind: service.kind(),
                characteristic,
            });
        }
        characteristic.validate(value)?;

        let record = self
            .accessory_mut(service.accessory())?
            .service_mut(service.id())?;
        record.values.insert(characteristic, value.clone());
        Ok(())
    }
}

impl MemoryRegistry {
    /// Creates an empty registry supporting every service kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that refuses to create the given kinds.
    #[must_use]
    pub fn with_unsupported(kinds: impl IntoIterator<Item = ServiceKind>) -> Self {
        Self {
            unsupported: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets how many notifications are kept before the oldest are dropped.
    ///
    /// A capacity of zero disables recording.
    #[must_use]
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    /// Restores a service from a persisted cache without uniqueness checks.
    ///
    /// Caches written by older plugin versions may hold same-kind services
    /// without subtypes; this reproduces that state.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAccessory` if the accessory does not
    /// exist.
    pub fn restore_service(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Result<ServiceHandle, RegistryError> {
        let mut inner = self.inner.write();
        let record = ServiceRecord::new(accessory, kind, subtype);
        let handle = record.handle.clone();
        inner.accessory_mut(accessory)?.services.push(record);
        Ok(handle)
    }

    /// Display name the accessory was registered with.
    #[must_use]
    pub fn display_name(&self, id: AccessoryId) -> Option<String> {
        self.inner
            .read()
            .accessories
            .get(&id)
            .map(|a| a.display_name.clone())
    }

    /// Removes and returns the retained notifications, oldest first.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.inner.write().notifications.drain(..).collect()
    }
}

impl AccessoryRegistry for MemoryRegistry {
    fn ensure_accessory(
        &self,
        id: AccessoryId,
        display_name: &str,
    ) -> Result<AccessoryOrigin, RegistryError> {
        let mut inner = self.inner.write();
        if inner.accessories.contains_key(&id) {
            return Ok(AccessoryOrigin::Cached);
        }

        let information = ServiceRecord::new(id, ServiceKind::AccessoryInformation, None);
        inner.accessories.insert(
            id,
            AccessoryRecord {
                display_name: display_name.to_string(),
                context: None,
                services: vec![information],
                links: Vec::new(),
            },
        );

        tracing::debug!(accessory = %id, display_name, "Registered accessory");
        Ok(AccessoryOrigin::Registered)
    }

    fn accessory_ids(&self) -> Vec<AccessoryId> {
        self.inner.read().accessories.keys().copied().collect()
    }

    fn unregister_accessory(&self, id: AccessoryId) -> Result<(), RegistryError> {
        self.inner
            .write()
            .accessories
            .remove(&id)
            .map(|_| ())
            .ok_or(RegistryError::UnknownAccessory(id))
    }

    fn context(&self, id: AccessoryId) -> Result<Option<DeviceSnapshot>, RegistryError> {
        Ok(self.inner.read().accessory(id)?.context.clone())
    }

    fn set_context(
        &self,
        id: AccessoryId,
        snapshot: DeviceSnapshot,
    ) -> Result<(), RegistryError> {
        self.inner.write().accessory_mut(id)?.context = Some(snapshot);
        Ok(())
    }

    fn services(&self, accessory: AccessoryId) -> Result<Vec<ServiceHandle>, RegistryError> {
        Ok(self
            .inner
            .read()
            .accessory(accessory)?
            .services
            .iter()
            .map(|s| s.handle.clone())
            .collect())
    }

    fn add_service(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Result<ServiceHandle, RegistryError> {
        if self.unsupported.contains(&kind) {
            return Err(RegistryError::UnsupportedService(kind));
        }

        let mut inner = self.inner.write();
        let record = inner.accessory_mut(accessory)?;
        if record.services.iter().any(|s| s.handle.matches(kind, subtype)) {
            return Err(RegistryError::DuplicateService {
                kind,
                subtype: subtype.map(str::to_string),
            });
        }

        let service = ServiceRecord::new(accessory, kind, subtype);
        let handle = service.handle.clone();
        record.services.push(service);
        Ok(handle)
    }

    fn set_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), RegistryError> {
        self.inner.write().write(service, characteristic, &value)
    }

    fn update_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        inner.write(service, characteristic, &value)?;
        if self.notification_capacity == 0 {
            return Ok(());
        }
        if inner.notifications.len() == self.notification_capacity {
            inner.notifications.pop_front();
        }
        inner.notifications.push_back(Notification {
            service: service.clone(),
            characteristic,
            value,
        });
        Ok(())
    }

    fn characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
    ) -> Result<Option<CharacteristicValue>, RegistryError> {
        let inner = self.inner.read();
        let record = inner
            .accessory(service.accessory())?
            .service(service.id())?;
        Ok(record.values.get(&characteristic).cloned())
    }

    fn add_linked_service(
        &self,
        service: &ServiceHandle,
        linked: &ServiceHandle,
    ) -> Result<(), RegistryError> {
        if service.accessory() != linked.accessory() {
            return Err(RegistryError::UnknownService(linked.id()));
        }

        let mut inner = self.inner.write();
        let record = inner.accessory_mut(service.accessory())?;
        record.service(service.id())?;
        record.service(linked.id())?;

        let link = (service.id(), linked.id());
        if !record.links.contains(&link) {
            record.links.push(link);
        }
        Ok(())
    }

    fn linked_services(
        &self,
        service: &ServiceHandle,
    ) -> Result<Vec<ServiceHandle>, RegistryError> {
        let inner = self.inner.read();
        let record = inner.accessory(service.accessory())?;
        record.service(service.id())?;

        record
            .links
            .iter()
            .filter_map(|&(from, to)| {
                if from == service.id() {
                    Some(to)
                } else if to == service.id() {
                    Some(from)
                } else {
                    None
                }
            })
            .map(|id| record.service(id).map(|s| s.handle.clone()))
            .collect()
    }
}
