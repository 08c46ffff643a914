// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristics and their typed values.
//!
//! Every [`Characteristic`] declares the [`Format`] and legal range of its
//! value. [`Characteristic::validate`] is the single place these contracts
//! are checked, both by registries on write and by bindings before they
//! seed anything.

use std::fmt;

use crate::error::RegistryError;
use crate::types::{Humidity, Percent, PositionState, Temperature};

/// Maximum length of HomeKit string characteristics.
pub const MAX_STRING_LEN: usize = 64;

/// The HomeKit characteristics used by Flair accessories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Characteristic {
    /// Display name of a service.
    Name,
    /// Accessory manufacturer.
    Manufacturer,
    /// Accessory model.
    Model,
    /// Accessory serial number.
    SerialNumber,
    /// Temperature in degrees Celsius.
    CurrentTemperature,
    /// Relative humidity percentage.
    CurrentRelativeHumidity,
    /// Confirmed position of a covering.
    CurrentPosition,
    /// Requested position of a covering.
    TargetPosition,
    /// Movement state of a covering.
    PositionState,
}

/// Value format of a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// UTF-8 string up to [`MAX_STRING_LEN`] bytes.
    String,
    /// Floating point number within `[min, max]`.
    Float {
        /// Smallest legal value.
        min: i16,
        /// Largest legal value.
        max: i16,
    },
    /// Unsigned byte within `[min, max]`.
    UInt8 {
        /// Smallest legal value.
        min: u8,
        /// Largest legal value.
        max: u8,
    },
}

impl Characteristic {
    /// Returns the characteristic name used in logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Manufacturer => "Manufacturer",
            Self::Model => "Model",
            Self::SerialNumber => "SerialNumber",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::CurrentRelativeHumidity => "CurrentRelativeHumidity",
            Self::CurrentPosition => "CurrentPosition",
            Self::TargetPosition => "TargetPosition",
            Self::PositionState => "PositionState",
        }
    }

    /// Returns the short HomeKit Accessory Protocol type UUID.
    #[must_use]
    pub const fn hap_type(&self) -> u16 {
        match self {
            Self::Name => 0x0023,
            Self::Manufacturer => 0x0020,
            Self::Model => 0x0021,
            Self::SerialNumber => 0x0030,
            Self::CurrentTemperature => 0x0011,
            Self::CurrentRelativeHumidity => 0x0010,
            Self::CurrentPosition => 0x006D,
            Self::TargetPosition => 0x007C,
            Self::PositionState => 0x0072,
        }
    }

    /// Returns the value format and range of this characteristic.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Name | Self::Manufacturer | Self::Model | Self::SerialNumber => Format::String,
            Self::CurrentTemperature => Format::Float { min: -270, max: 100 },
            Self::CurrentRelativeHumidity => Format::Float { min: 0, max: 100 },
            Self::CurrentPosition | Self::TargetPosition => Format::UInt8 { min: 0, max: 100 },
            Self::PositionState => Format::UInt8 { min: 0, max: 2 },
        }
    }

    /// Returns `true` if HomeKit clients may write this characteristic.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::TargetPosition)
    }

    /// Checks `value` against this characteristic's format and range.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidValue` describing the mismatch.
    pub fn validate(self, value: &CharacteristicValue) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidValue {
            characteristic: self,
            reason,
        };

        match (self.format(), value) {
            (Format::String, CharacteristicValue::String(s)) => {
                if s.len() > MAX_STRING_LEN {
                    return Err(invalid(format!(
                        "string of {} bytes exceeds {MAX_STRING_LEN}",
                        s.len()
                    )));
                }
                Ok(())
            }
            (Format::Float { min, max }, CharacteristicValue::Float(v)) => {
                if !(f64::from(min)..=f64::from(max)).contains(v) {
                    return Err(invalid(format!("{v} is out of range [{min}, {max}]")));
                }
                Ok(())
            }
            (Format::UInt8 { min, max }, CharacteristicValue::UInt8(v)) => {
                if !(min..=max).contains(v) {
                    return Err(invalid(format!("{v} is out of range [{min}, {max}]")));
                }
                Ok(())
            }
            (format, value) => Err(invalid(format!(
                "expected {format:?}, got {}",
                value.type_name()
            ))),
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed characteristic value.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    /// String value.
    String(String),
    /// Floating point value.
    Float(f64),
    /// Unsigned byte value (percentages and enums).
    UInt8(u8),
}

impl CharacteristicValue {
    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the float value, if this is a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the byte value, if this is a byte.
    #[must_use]
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::UInt8(v) => Some(*v),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Float(_) => "float",
            Self::UInt8(_) => "uint8",
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Temperature> for CharacteristicValue {
    fn from(value: Temperature) -> Self {
        Self::Float(value.as_celsius())
    }
}

impl From<Humidity> for CharacteristicValue {
    fn from(value: Humidity) -> Self {
        Self::Float(value.value())
    }
}

impl From<Percent> for CharacteristicValue {
    fn from(value: Percent) -> Self {
        Self::UInt8(value.value())
    }
}

impl From<PositionState> for CharacteristicValue {
    fn from(value: PositionState) -> Self {
        Self::UInt8(value.as_num())
    }
}
