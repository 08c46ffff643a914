// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshots of remote Flair devices.
//!
//! A [`DeviceSnapshot`] is the state a device reported at one point in
//! time. Bindings project snapshots onto accessories and never mutate them;
//! a fresh snapshot is required for every re-sync.

mod document;
mod puck;
mod vent;

pub use document::{
    Rejected, parse_document, parse_listing, parse_pucks, parse_snapshot, parse_vents,
};
pub use puck::Puck;
pub use vent::Vent;

use std::fmt;

/// The kinds of Flair devices exposed as accessories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Temperature/humidity sensor.
    Puck,
    /// Motorized register vent.
    Vent,
}

impl DeviceKind {
    /// Model string stamped on the accessory.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        match self {
            Self::Puck => "Puck",
            Self::Vent => "Vent",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model())
    }
}

/// Reported state of one Flair device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSnapshot {
    /// A puck report.
    Puck(Puck),
    /// A vent report.
    Vent(Vent),
}

impl DeviceSnapshot {
    /// Kind of the reporting device.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Puck(_) => DeviceKind::Puck,
            Self::Vent(_) => DeviceKind::Vent,
        }
    }

    /// Flair resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Puck(puck) => puck.id(),
            Self::Vent(vent) => vent.id(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Puck(puck) => puck.name(),
            Self::Vent(vent) => vent.name(),
        }
    }

    /// Serial number stamped on the accessory.
    ///
    /// Pucks use their printed display number, vents their resource id.
    #[must_use]
    pub fn serial(&self) -> &str {
        match self {
            Self::Puck(puck) => puck.display_number(),
            Self::Vent(vent) => vent.id(),
        }
    }
}

impl From<Puck> for DeviceSnapshot {
    fn from(puck: Puck) -> Self {
        Self::Puck(puck)
    }
}

impl From<Vent> for DeviceSnapshot {
    fn from(vent: Vent) -> Self {
        Self::Vent(vent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Humidity, Percent, Temperature};

    #[test]
    fn serial_depends_on_kind() {
        let puck: DeviceSnapshot = Puck::new(
            "p1",
            "Bedroom",
            "PK-7",
            Temperature::celsius(20.0).unwrap(),
            Humidity::new(50.0).unwrap(),
        )
        .into();
        let vent: DeviceSnapshot = Vent::new("v1", "Hall", Percent::OPEN).into();

        assert_eq!(puck.serial(), "PK-7");
        assert_eq!(vent.serial(), "v1");
        assert_eq!(puck.kind().model(), "Puck");
        assert_eq!(vent.kind().to_string(), "Vent");
    }
}
