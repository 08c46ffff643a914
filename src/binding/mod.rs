// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-to-accessory bindings.
//!
//! A binding projects one [`DeviceSnapshot`] onto the services of one
//! accessory. Binding runs in four phases:
//!
//! 1. every service of the [`Profile`] is resolved, so a conflict or a
//!    missing service aborts before anything is written;
//! 2. every seeded value is projected and validated;
//! 3. profile links are recorded and the identity is stamped;
//! 4. characteristics are seeded.
//!
//! Binding the same accessory again with a fresh snapshot reuses its
//! services and overwrites the seeded values.
//!
//! # Examples
//!
//! ```
//! use flair_bridge::accessory::{AccessoryId, Characteristic, CharacteristicValue, ServiceKind};
//! use flair_bridge::binding;
//! use flair_bridge::device::{DeviceSnapshot, Vent};
//! use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
//! use flair_bridge::types::Percent;
//!
//! let registry = MemoryRegistry::new();
//! let accessory = AccessoryId::for_device("v1");
//! registry.ensure_accessory(accessory, "Living Room Vent").unwrap();
//!
//! let vent = Vent::new("v1", "Living Room Vent", Percent::new(42).unwrap());
//! let snapshot = DeviceSnapshot::from(vent);
//! let bound = binding::bind(&registry, accessory, &snapshot).unwrap();
//!
//! let covering = bound.service(ServiceKind::WindowCovering).unwrap();
//! assert_eq!(
//!     registry.characteristic(covering, Characteristic::TargetPosition).unwrap(),
//!     Some(CharacteristicValue::UInt8(42))
//! );
//! ```

mod identity;
mod profile;
mod puck;
mod resolver;
mod vent;

pub use identity::{Identity, IdentityStamper};
pub use profile::{Field, MANUFACTURER, PUCK_PROFILE, Profile, ServiceTemplate, VENT_PROFILE};
pub use puck::PuckBinding;
pub use resolver::ServiceResolver;
pub use vent::{CommandOutcome, CommandTicket, DEFAULT_COMMAND_TIMEOUT, VentBinding};

use std::collections::BTreeMap;

use crate::accessory::{
    AccessoryId, Characteristic, CharacteristicValue, ServiceHandle, ServiceKind,
};
use crate::device::{DeviceKind, DeviceSnapshot};
use crate::error::{BindingError, RegistryError, Result};
use crate::registry::AccessoryRegistry;

/// Services of an accessory after a successful bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundAccessory {
    kind: DeviceKind,
    accessory: AccessoryId,
    services: BTreeMap<ServiceKind, ServiceHandle>,
}

impl BoundAccessory {
    /// Kind of the bound device.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// The bound accessory.
    #[must_use]
    pub fn accessory(&self) -> AccessoryId {
        self.accessory
    }

    /// The service of `kind`, including `AccessoryInformation`.
    #[must_use]
    pub fn service(&self, kind: ServiceKind) -> Option<&ServiceHandle> {
        self.services.get(&kind)
    }

    /// All bound services ordered by kind.
    pub fn services(&self) -> impl Iterator<Item = &ServiceHandle> {
        self.services.values()
    }
}

/// Generic binding driven by a [`Profile`].
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    profile: &'static Profile,
}

impl Binding {
    /// Creates a binding for `profile`.
    #[must_use]
    pub const fn new(profile: &'static Profile) -> Self {
        Self { profile }
    }

    /// Creates the binding for a device kind.
    #[must_use]
    pub fn for_kind(kind: DeviceKind) -> Self {
        Self::new(Profile::for_kind(kind))
    }

    /// The profile driving this binding.
    #[must_use]
    pub const fn profile(&self) -> &'static Profile {
        self.profile
    }

    /// Binds `snapshot` onto `accessory`.
    ///
    /// # Errors
    ///
    /// - `BindingError::WrongDeviceKind` if the snapshot does not match the
    ///   profile
    /// - `BindingError::ServiceConflict` / `MissingRequiredService` from
    ///   service resolution
    /// - `BindingError::InvalidCharacteristic` if a projected value is
    ///   rejected by its characteristic
    ///
    /// No characteristic is written when any of these occurs.
    pub fn bind<R: AccessoryRegistry + ?Sized>(
        &self,
        registry: &R,
        accessory: AccessoryId,
        snapshot: &DeviceSnapshot,
    ) -> Result<BoundAccessory> {
        let profile = self.profile;
        if snapshot.kind() != profile.device_kind {
            return Err(BindingError::WrongDeviceKind {
                expected: profile.device_kind,
                actual: snapshot.kind(),
            }
            .into());
        }

        let resolver = ServiceResolver::new(registry);
        let mut services = BTreeMap::new();
        services.insert(
            ServiceKind::AccessoryInformation,
            resolver.resolve(accessory, ServiceKind::AccessoryInformation)?,
        );
        for template in profile.services {
            let service = resolver.resolve_with_subtype(accessory, template.kind, template.subtype)?;
            services.insert(template.kind, service);
        }

        let identity = Identity {
            manufacturer: MANUFACTURER,
            model: profile.model(),
            serial: snapshot.serial(),
        };
        let writes = plan(profile, &services, snapshot, &identity)?;

        for &(from, to) in profile.links {
            if let (Some(from), Some(to)) = (services.get(&from), services.get(&to)) {
                registry.add_linked_service(from, to)?;
            }
        }
        IdentityStamper::new(registry).stamp(accessory, &identity)?;
        for (service, characteristic, value) in writes {
            registry.set_characteristic(service, characteristic, value)?;
        }

        tracing::info!(
            %accessory,
            device_id = snapshot.id(),
            kind = %profile.device_kind,
            "Bound accessory"
        );

        Ok(BoundAccessory {
            kind: profile.device_kind,
            accessory,
            services,
        })
    }
}

/// Binds `snapshot` with the profile of its device kind.
///
/// # Errors
///
/// See [`Binding::bind`].
pub fn bind<R: AccessoryRegistry + ?Sized>(
    registry: &R,
    accessory: AccessoryId,
    snapshot: &DeviceSnapshot,
) -> Result<BoundAccessory> {
    Binding::for_kind(snapshot.kind()).bind(registry, accessory, snapshot)
}

type PlannedWrite<'s> = (&'s ServiceHandle, Characteristic, CharacteristicValue);

/// Projects and validates every seeded value before anything is written.
fn plan<'s>(
    profile: &Profile,
    services: &'s BTreeMap<ServiceKind, ServiceHandle>,
    snapshot: &DeviceSnapshot,
    identity: &Identity<'_>,
) -> Result<Vec<PlannedWrite<'s>>> {
    for (characteristic, value) in [
        (Characteristic::Manufacturer, identity.manufacturer),
        (Characteristic::Model, identity.model),
        (Characteristic::SerialNumber, identity.serial),
    ] {
        check(characteristic, &value.into())?;
    }

    let mut writes = Vec::new();
    for template in profile.services {
        let Some(service) = services.get(&template.kind) else {
            continue;
        };
        for &(characteristic, field) in template.characteristics {
            // Optional readings that were not reported are left untouched.
            let Some(value) = field.project(snapshot) else {
                continue;
            };
            match check(characteristic, &value) {
                Ok(()) => writes.push((service, characteristic, value)),
                Err(error) if field.is_optional() => {
                    tracing::warn!(
                        device_id = snapshot.id(),
                        %characteristic,
                        %error,
                        "Skipping rejected optional reading"
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }
    Ok(writes)
}

fn check(characteristic: Characteristic, value: &CharacteristicValue) -> Result<()> {
    characteristic.validate(value).map_err(|e| match e {
        RegistryError::InvalidValue {
            characteristic,
            reason,
        } => BindingError::InvalidCharacteristic {
            characteristic,
            reason,
        }
        .into(),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Puck, Vent};
    use crate::error::Error;
    use crate::registry::MemoryRegistry;
    use crate::types::{Humidity, Percent, Temperature};

    fn registry_with(accessory: AccessoryId) -> MemoryRegistry {
        let registry = MemoryRegistry::new();
        registry.ensure_accessory(accessory, "Test").unwrap();
        registry
    }

    fn puck_named(name: &str) -> DeviceSnapshot {
        Puck::new(
            "p1",
            name,
            "PK-7",
            Temperature::celsius(21.5).unwrap(),
            Humidity::new(48.0).unwrap(),
        )
        .into()
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let accessory = AccessoryId::for_device("p1");
        let registry = registry_with(accessory);

        let err = Binding::new(&VENT_PROFILE)
            .bind(&registry, accessory, &puck_named("Bedroom"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::WrongDeviceKind {
                expected: DeviceKind::Vent,
                actual: DeviceKind::Puck,
            })
        ));
    }

    #[test]
    fn invalid_value_aborts_before_writes() {
        let accessory = AccessoryId::for_device("p1");
        let registry = registry_with(accessory);

        let err = bind(&registry, accessory, &puck_named(&"x".repeat(80))).unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::InvalidCharacteristic {
                characteristic: Characteristic::Name,
                ..
            })
        ));

        for service in registry.services(accessory).unwrap() {
            assert!(registry.linked_services(&service).unwrap().is_empty());
            assert_eq!(
                registry
                    .characteristic(&service, Characteristic::SerialNumber)
                    .unwrap(),
                None
            );
        }
    }

    #[test]
    fn duct_temperature_is_seeded_when_reported() {
        let accessory = AccessoryId::for_device("v1");
        let registry = registry_with(accessory);
        let vent = Vent::new("v1", "Hall", Percent::new(10).unwrap())
            .with_duct_temperature(Temperature::celsius(16.5).unwrap());

        let bound = bind(&registry, accessory, &vent.into()).unwrap();
        let sensor = bound.service(ServiceKind::TemperatureSensor).unwrap();
        assert_eq!(
            registry
                .characteristic(sensor, Characteristic::CurrentTemperature)
                .unwrap(),
            Some(CharacteristicValue::Float(16.5))
        );
    }

    #[test]
    fn out_of_range_duct_temperature_is_skipped() {
        let accessory = AccessoryId::for_device("v1");
        let registry = registry_with(accessory);
        let vent = Vent::new("v1", "Hall", Percent::new(42).unwrap())
            .with_duct_temperature(Temperature::celsius(101.0).unwrap());

        let bound = bind(&registry, accessory, &vent.into()).unwrap();
        let covering = bound.service(ServiceKind::WindowCovering).unwrap();
        let sensor = bound.service(ServiceKind::TemperatureSensor).unwrap();
        assert_eq!(
            registry
                .characteristic(covering, Characteristic::CurrentPosition)
                .unwrap(),
            Some(CharacteristicValue::UInt8(42))
        );
        assert_eq!(
            registry
                .characteristic(sensor, Characteristic::CurrentTemperature)
                .unwrap(),
            None
        );
        assert!(!registry.linked_services(covering).unwrap().is_empty());
    }

    #[test]
    fn bound_accessory_lists_all_services() {
        let accessory = AccessoryId::for_device("p1");
        let registry = registry_with(accessory);

        let bound = bind(&registry, accessory, &puck_named("Bedroom")).unwrap();
        assert_eq!(bound.kind(), DeviceKind::Puck);
        assert_eq!(bound.accessory(), accessory);
        assert_eq!(bound.services().count(), 3);
        assert!(bound.service(ServiceKind::WindowCovering).is_none());
    }
}
