// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative binding profiles.
//!
//! A [`Profile`] lists, for one device kind, the services to expose, which
//! snapshot [`Field`] seeds each characteristic, and which services are
//! linked. Pucks and vents differ only in their profile tables.

use crate::accessory::{Characteristic, CharacteristicValue, ServiceKind};
use crate::device::{DeviceKind, DeviceSnapshot};
use crate::types::PositionState;

/// Manufacturer stamped on every Flair accessory.
pub const MANUFACTURER: &str = "Flair";

/// A value read out of a device snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Display name of the device.
    Name,
    /// Puck temperature.
    CurrentTemperature,
    /// Puck relative humidity.
    CurrentHumidity,
    /// Vent opening.
    PercentOpen,
    /// Movement of a device that has just reported; always stopped.
    RestingPositionState,
    /// Vent duct temperature, when reported.
    DuctTemperature,
}

impl Field {
    /// Projects the field out of `snapshot`.
    ///
    /// Returns `None` when the snapshot does not carry the field, either
    /// because it belongs to the other device kind or because an optional
    /// reading was not reported.
    #[must_use]
    pub fn project(self, snapshot: &DeviceSnapshot) -> Option<CharacteristicValue> {
        match (self, snapshot) {
            (Self::Name, _) => Some(snapshot.name().into()),
            (Self::CurrentTemperature, DeviceSnapshot::Puck(puck)) => {
                Some(puck.current_temperature().into())
            }
            (Self::CurrentHumidity, DeviceSnapshot::Puck(puck)) => {
                Some(puck.current_humidity().into())
            }
            (Self::PercentOpen, DeviceSnapshot::Vent(vent)) => Some(vent.percent_open().into()),
            (Self::RestingPositionState, DeviceSnapshot::Vent(_)) => {
                Some(PositionState::Stopped.into())
            }
            (Self::DuctTemperature, DeviceSnapshot::Vent(vent)) => {
                vent.duct_temperature().map(Into::into)
            }
            _ => None,
        }
    }

    /// Whether the field is a reading the device may omit.
    ///
    /// An optional reading that its characteristic rejects is skipped
    /// rather than failing the bind.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::DuctTemperature)
    }
}

/// One service of a profile.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTemplate {
    /// Kind of the service.
    pub kind: ServiceKind,
    /// Distinguishing subtype, if the kind may appear more than once.
    pub subtype: Option<&'static str>,
    /// Characteristics seeded at bind time and the fields they come from.
    pub characteristics: &'static [(Characteristic, Field)],
}

/// How one device kind is exposed as an accessory.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Device kind the profile applies to.
    pub device_kind: DeviceKind,
    /// Services, in resolution order.
    pub services: &'static [ServiceTemplate],
    /// `(from, to)` links between services of the profile.
    pub links: &'static [(ServiceKind, ServiceKind)],
}

impl Profile {
    /// Model string stamped on the accessory.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        self.device_kind.model()
    }

    /// Returns the profile for a device kind.
    #[must_use]
    pub fn for_kind(kind: DeviceKind) -> &'static Profile {
        match kind {
            DeviceKind::Puck => &PUCK_PROFILE,
            DeviceKind::Vent => &VENT_PROFILE,
        }
    }
}

/// Pucks: a temperature sensor linked to a humidity sensor.
pub static PUCK_PROFILE: Profile = Profile {
    device_kind: DeviceKind::Puck,
    services: &[
        ServiceTemplate {
            kind: ServiceKind::TemperatureSensor,
            subtype: None,
            characteristics: &[
                (Characteristic::Name, Field::Name),
                (Characteristic::CurrentTemperature, Field::CurrentTemperature),
            ],
        },
        ServiceTemplate {
            kind: ServiceKind::HumiditySensor,
            subtype: None,
            characteristics: &[
                (Characteristic::Name, Field::Name),
                (Characteristic::CurrentRelativeHumidity, Field::CurrentHumidity),
            ],
        },
    ],
    links: &[(ServiceKind::TemperatureSensor, ServiceKind::HumiditySensor)],
};

/// Vents: a window covering linked to the duct temperature sensor.
pub static VENT_PROFILE: Profile = Profile {
    device_kind: DeviceKind::Vent,
    services: &[
        ServiceTemplate {
            kind: ServiceKind::WindowCovering,
            subtype: None,
            characteristics: &[
                (Characteristic::Name, Field::Name),
                (Characteristic::TargetPosition, Field::PercentOpen),
                (Characteristic::CurrentPosition, Field::PercentOpen),
                (Characteristic::PositionState, Field::RestingPositionState),
            ],
        },
        ServiceTemplate {
            kind: ServiceKind::TemperatureSensor,
            subtype: None,
            characteristics: &[(Characteristic::CurrentTemperature, Field::DuctTemperature)],
        },
    ],
    links: &[(ServiceKind::WindowCovering, ServiceKind::TemperatureSensor)],
};
