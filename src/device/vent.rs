// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vent snapshot.

use crate::types::{Percent, Temperature};

/// Reported state of a Flair Vent.
///
/// A snapshot is always at rest: the API reports where the vent is, not
/// where it is going.
///
/// # Examples
///
/// ```
/// use flair_bridge::device::Vent;
/// use flair_bridge::types::Percent;
///
/// let vent = Vent::new("v1", "Living Room Vent", Percent::new(42).unwrap());
/// assert_eq!(vent.percent_open().value(), 42);
/// assert!(vent.duct_temperature().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vent {
    id: String,
    name: String,
    percent_open: Percent,
    duct_temperature: Option<Temperature>,
}

impl Vent {
    /// Creates a vent snapshot.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, percent_open: Percent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            percent_open,
            duct_temperature: None,
        }
    }

    /// Sets the duct temperature reading.
    #[must_use]
    pub fn with_duct_temperature(mut self, temperature: Temperature) -> Self {
        self.duct_temperature = Some(temperature);
        self
    }

    /// Flair resource id; used as the serial number.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the vent.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reported opening.
    #[must_use]
    pub fn percent_open(&self) -> Percent {
        self.percent_open
    }

    /// Air temperature measured in the duct, when reported.
    #[must_use]
    pub fn duct_temperature(&self) -> Option<Temperature> {
        self.duct_temperature
    }
}
