// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Puck snapshot.

use crate::types::{Humidity, Temperature};

/// Reported state of a Flair Puck (room temperature/humidity sensor).
///
/// # Examples
///
/// ```
/// use flair_bridge::device::Puck;
/// use flair_bridge::types::{Humidity, Temperature};
///
/// let puck = Puck::new(
///     "p1",
///     "Bedroom",
///     "PK-7",
///     Temperature::celsius(21.5).unwrap(),
///     Humidity::new(48.0).unwrap(),
/// );
/// assert_eq!(puck.display_number(), "PK-7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Puck {
    id: String,
    name: String,
    display_number: String,
    current_temperature: Temperature,
    current_humidity: Humidity,
}

impl Puck {
    /// Creates a puck snapshot from validated readings.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        display_number: impl Into<String>,
        current_temperature: Temperature,
        current_humidity: Humidity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_number: display_number.into(),
            current_temperature,
            current_humidity,
        }
    }

    /// Flair resource id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the puck.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number printed on the puck; used as the serial number.
    #[must_use]
    pub fn display_number(&self) -> &str {
        &self.display_number
    }

    /// Current room temperature.
    #[must_use]
    pub fn current_temperature(&self) -> Temperature {
        self.current_temperature
    }

    /// Current relative humidity.
    #[must_use]
    pub fn current_humidity(&self) -> Humidity {
        self.current_humidity
    }
}
