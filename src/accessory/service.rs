// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service kinds and handles.

use std::fmt;

use super::{AccessoryId, Characteristic, ServiceId};

/// The HomeKit service types used by Flair accessories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    /// Manufacturer, model and serial of the accessory.
    AccessoryInformation,
    /// Read-only temperature sensor.
    TemperatureSensor,
    /// Read-only relative humidity sensor.
    HumiditySensor,
    /// Positionable covering; used for vents.
    WindowCovering,
}

impl ServiceKind {
    /// Returns the service name used in logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessoryInformation => "AccessoryInformation",
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::WindowCovering => "WindowCovering",
        }
    }

    /// Returns the short HomeKit Accessory Protocol type UUID.
    #[must_use]
    pub const fn hap_type(&self) -> u16 {
        match self {
            Self::AccessoryInformation => 0x003E,
            Self::TemperatureSensor => 0x008A,
            Self::HumiditySensor => 0x0082,
            Self::WindowCovering => 0x008C,
        }
    }

    /// Characteristics a service of this kind may expose.
    #[must_use]
    pub const fn characteristics(&self) -> &'static [Characteristic] {
        match self {
            Self::AccessoryInformation => &[
                Characteristic::Name,
                Characteristic::Manufacturer,
                Characteristic::Model,
                Characteristic::SerialNumber,
            ],
            Self::TemperatureSensor => &[Characteristic::Name, Characteristic::CurrentTemperature],
            Self::HumiditySensor => &[
                Characteristic::Name,
                Characteristic::CurrentRelativeHumidity,
            ],
            Self::WindowCovering => &[
                Characteristic::Name,
                Characteristic::CurrentPosition,
                Characteristic::TargetPosition,
                Characteristic::PositionState,
            ],
        }
    }

    /// Returns `true` if `characteristic` belongs to this service kind.
    #[must_use]
    pub fn supports(&self, characteristic: Characteristic) -> bool {
        self.characteristics().contains(&characteristic)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a service attached to an accessory.
///
/// Handles are cheap to clone and carry everything needed to address the
/// service through an [`AccessoryRegistry`](crate::registry::AccessoryRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceHandle {
    accessory: AccessoryId,
    id: ServiceId,
    kind: ServiceKind,
    subtype: Option<String>,
}

impl ServiceHandle {
    /// Creates a handle. Called by registry implementations.
    #[must_use]
    pub fn new(
        accessory: AccessoryId,
        id: ServiceId,
        kind: ServiceKind,
        subtype: Option<String>,
    ) -> Self {
        Self {
            accessory,
            id,
            kind,
            subtype,
        }
    }

    /// Accessory owning the service.
    #[must_use]
    pub fn accessory(&self) -> AccessoryId {
        self.accessory
    }

    /// Identifier of the service.
    #[must_use]
    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// Kind of the service.
    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Subtype distinguishing same-kind services, if any.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Returns `true` if this handle matches `kind` and `subtype` exactly.
    #[must_use]
    pub fn matches(&self, kind: ServiceKind, subtype: Option<&str>) -> bool {
        self.kind == kind && self.subtype.as_deref() == subtype
    }
}
