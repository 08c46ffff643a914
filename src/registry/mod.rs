// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The host accessory registry port.
//!
//! The host runtime owns the accessory graph and persists it across
//! restarts. Bindings reach it only through the [`AccessoryRegistry`]
//! capability set, so the core can run against any host, including the
//! in-process [`MemoryRegistry`].
//!
//! All operations are synchronous in-memory mutations; none of them block.

mod memory;

pub use memory::{DEFAULT_NOTIFICATION_CAPACITY, MemoryRegistry, Notification};

use crate::accessory::{
    AccessoryId, Characteristic, CharacteristicValue, ServiceHandle, ServiceKind,
};
use crate::device::DeviceSnapshot;
use crate::error::RegistryError;

/// Whether [`AccessoryRegistry::ensure_accessory`] reused or created an
/// accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessoryOrigin {
    /// The accessory was restored from the host's cache.
    Cached,
    /// The accessory was registered by this call.
    Registered,
}

/// Capability set of the host accessory registry.
///
/// Implementations must be usable from several tasks at once; vent
/// command completions write back from spawned tasks.
pub trait AccessoryRegistry: Send + Sync {
    /// Returns the cached accessory or registers a new one.
    ///
    /// A newly registered accessory already carries an
    /// `AccessoryInformation` service.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the registration.
    fn ensure_accessory(
        &self,
        id: AccessoryId,
        display_name: &str,
    ) -> Result<AccessoryOrigin, RegistryError>;

    /// Ids of all accessories currently known to the host.
    fn accessory_ids(&self) -> Vec<AccessoryId>;

    /// Removes an accessory and all of its services.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAccessory` if it does not exist.
    fn unregister_accessory(&self, id: AccessoryId) -> Result<(), RegistryError>;

    /// The snapshot stored in the accessory's context slot.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAccessory` if it does not exist.
    fn context(&self, id: AccessoryId) -> Result<Option<DeviceSnapshot>, RegistryError>;

    /// Replaces the snapshot stored in the accessory's context slot.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAccessory` if it does not exist.
    fn set_context(&self, id: AccessoryId, snapshot: DeviceSnapshot)
    -> Result<(), RegistryError>;

    /// All services attached to the accessory.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAccessory` if it does not exist.
    fn services(&self, accessory: AccessoryId) -> Result<Vec<ServiceHandle>, RegistryError>;

    /// Attaches a new service.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateService` if a service with the same
    /// kind and subtype exists, or `RegistryError::UnsupportedService` if
    /// the host cannot provide the kind.
    fn add_service(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Result<ServiceHandle, RegistryError>;

    /// Writes a characteristic value as if requested by a controller.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown services, characteristics foreign to
    /// the service kind, or values outside the characteristic's contract.
    fn set_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), RegistryError>;

    /// Pushes a new value reported by the device to subscribed controllers.
    ///
    /// # Errors
    ///
    /// Same as [`set_characteristic`](Self::set_characteristic).
    fn update_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), RegistryError>;

    /// Reads the current value of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownService` for unknown services.
    fn characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Characteristic,
    ) -> Result<Option<CharacteristicValue>, RegistryError>;

    /// Records a non-owning link from `service` to `linked`.
    ///
    /// # Errors
    ///
    /// Returns an error if either service is unknown or they belong to
    /// different accessories.
    fn add_linked_service(
        &self,
        service: &ServiceHandle,
        linked: &ServiceHandle,
    ) -> Result<(), RegistryError>;

    /// Services linked with `service`, in either direction.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownService` for unknown services.
    fn linked_services(&self, service: &ServiceHandle)
    -> Result<Vec<ServiceHandle>, RegistryError>;
}
