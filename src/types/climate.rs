// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor reading types reported by pucks and vents.

use std::fmt;

use crate::error::ValueError;

/// A temperature reading in degrees Celsius.
///
/// Any finite value is accepted; range checks against the HomeKit
/// characteristic happen when the value is projected onto a service.
///
/// # Examples
///
/// ```
/// use flair_bridge::types::Temperature;
///
/// let t = Temperature::celsius(21.5).unwrap();
/// assert!((t.as_celsius() - 21.5).abs() < f64::EPSILON);
///
/// assert!(Temperature::celsius(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    /// Creates a temperature from degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NonFiniteTemperature` for NaN or infinite input.
    pub fn celsius(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NonFiniteTemperature(value));
        }
        Ok(Self(value))
    }

    /// Returns the reading in degrees Celsius.
    #[must_use]
    pub const fn as_celsius(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}\u{b0}C", self.0)
    }
}

/// A relative humidity reading as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use flair_bridge::types::Humidity;
///
/// let h = Humidity::new(48.0).unwrap();
/// assert!((h.value() - 48.0).abs() < f64::EPSILON);
///
/// assert!(Humidity::new(100.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Humidity(f64);

impl Humidity {
    /// Creates a humidity reading.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::HumidityOutOfRange` if the value is not within
    /// [0, 100] (NaN included).
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(ValueError::HumidityOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the relative humidity percentage.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Humidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0)
    }
}
