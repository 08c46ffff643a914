// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Puck binding.

use crate::accessory::{AccessoryId, ServiceHandle, ServiceKind};
use crate::device::{DeviceSnapshot, Puck};
use crate::error::{BindingError, Result};
use crate::registry::AccessoryRegistry;

use super::{Binding, BoundAccessory, PUCK_PROFILE};

/// A puck bound to its accessory.
///
/// Pucks are read-only sensors. A fresh snapshot is applied by binding
/// again, which replaces this value.
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::AccessoryId;
/// use flair_bridge::binding::PuckBinding;
/// use flair_bridge::device::Puck;
/// use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
/// use flair_bridge::types::{Humidity, Temperature};
///
/// let registry = MemoryRegistry::new();
/// let accessory = AccessoryId::for_device("p1");
/// registry.ensure_accessory(accessory, "Bedroom").unwrap();
///
/// let puck = Puck::new(
///     "p1",
///     "Bedroom",
///     "PK-7",
///     Temperature::celsius(21.5).unwrap(),
///     Humidity::new(48.0).unwrap(),
/// );
/// let binding = PuckBinding::bind(&registry, accessory, &puck).unwrap();
/// assert_eq!(binding.serial(), "PK-7");
/// ```
#[derive(Debug, Clone)]
pub struct PuckBinding {
    bound: BoundAccessory,
    temperature: ServiceHandle,
    humidity: ServiceHandle,
    serial: String,
}

impl PuckBinding {
    /// Binds `puck` onto `accessory`.
    ///
    /// # Errors
    ///
    /// See [`Binding::bind`].
    pub fn bind<R: AccessoryRegistry + ?Sized>(
        registry: &R,
        accessory: AccessoryId,
        puck: &Puck,
    ) -> Result<Self> {
        let snapshot = DeviceSnapshot::Puck(puck.clone());
        let bound = Binding::new(&PUCK_PROFILE).bind(registry, accessory, &snapshot)?;

        let temperature = required(&bound, ServiceKind::TemperatureSensor)?;
        let humidity = required(&bound, ServiceKind::HumiditySensor)?;

        Ok(Self {
            bound,
            temperature,
            humidity,
            serial: puck.display_number().to_string(),
        })
    }

    /// Services created or reused by the bind.
    #[must_use]
    pub fn bound(&self) -> &BoundAccessory {
        &self.bound
    }

    /// The temperature sensor service.
    #[must_use]
    pub fn temperature_service(&self) -> &ServiceHandle {
        &self.temperature
    }

    /// The humidity sensor service.
    #[must_use]
    pub fn humidity_service(&self) -> &ServiceHandle {
        &self.humidity
    }

    /// Serial number stamped on the accessory.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }
}

pub(super) fn required(bound: &BoundAccessory, kind: ServiceKind) -> Result<ServiceHandle> {
    bound
        .service(kind)
        .cloned()
        .ok_or_else(|| BindingError::MissingRequiredService { kind }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{Characteristic, CharacteristicValue};
    use crate::error::Error;
    use crate::registry::MemoryRegistry;
    use crate::types::{Humidity, Temperature};

    fn puck(temperature: f64, humidity: f64) -> Puck {
        Puck::new(
            "p1",
            "Bedroom",
            "PK-7",
            Temperature::celsius(temperature).unwrap(),
            Humidity::new(humidity).unwrap(),
        )
    }

    #[test]
    fn seeds_sensor_readings() {
        let registry = MemoryRegistry::new();
        let accessory = AccessoryId::for_device("p1");
        registry.ensure_accessory(accessory, "Bedroom").unwrap();

        let binding = PuckBinding::bind(&registry, accessory, &puck(21.5, 48.0)).unwrap();

        assert_eq!(
            registry
                .characteristic(
                    binding.temperature_service(),
                    Characteristic::CurrentTemperature
                )
                .unwrap(),
            Some(CharacteristicValue::Float(21.5))
        );
        assert_eq!(
            registry
                .characteristic(
                    binding.humidity_service(),
                    Characteristic::CurrentRelativeHumidity
                )
                .unwrap(),
            Some(CharacteristicValue::Float(48.0))
        );
        assert_eq!(
            registry
                .characteristic(binding.humidity_service(), Characteristic::Name)
                .unwrap(),
            Some(CharacteristicValue::String("Bedroom".into()))
        );
    }

    #[test]
    fn links_temperature_to_humidity() {
        let registry = MemoryRegistry::new();
        let accessory = AccessoryId::for_device("p1");
        registry.ensure_accessory(accessory, "Bedroom").unwrap();

        let binding = PuckBinding::bind(&registry, accessory, &puck(20.0, 40.0)).unwrap();

        assert_eq!(
            registry
                .linked_services(binding.temperature_service())
                .unwrap(),
            vec![binding.humidity_service().clone()]
        );
    }

    #[test]
    fn missing_humidity_service_aborts() {
        let registry = MemoryRegistry::with_unsupported([ServiceKind::HumiditySensor]);
        let accessory = AccessoryId::for_device("p1");
        registry.ensure_accessory(accessory, "Bedroom").unwrap();

        let err = PuckBinding::bind(&registry, accessory, &puck(20.0, 40.0)).unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::MissingRequiredService {
                kind: ServiceKind::HumiditySensor
            })
        ));

        let temperature = registry
            .services(accessory)
            .unwrap()
            .into_iter()
            .find(|s| s.kind() == ServiceKind::TemperatureSensor)
            .unwrap();
        assert_eq!(
            registry
                .characteristic(&temperature, Characteristic::CurrentTemperature)
                .unwrap(),
            None
        );
    }
}
