// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Movement state of a window covering.

use std::fmt;

use crate::error::ValueError;

use super::Percent;

/// HomeKit `PositionState` of a window covering.
///
/// The numeric values follow the HomeKit Accessory Protocol: 0 means the
/// covering is moving towards closed, 1 towards open, 2 stopped.
///
/// # Examples
///
/// ```
/// use flair_bridge::types::{Percent, PositionState};
///
/// let opening = PositionState::toward(Percent::CLOSED, Percent::OPEN);
/// assert_eq!(opening, PositionState::Increasing);
/// assert_eq!(opening.as_num(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionState {
    /// Closing.
    Decreasing,
    /// Opening.
    Increasing,
    /// At rest.
    #[default]
    Stopped,
}

impl PositionState {
    /// Returns the HomeKit numeric value.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Decreasing => 0,
            Self::Increasing => 1,
            Self::Stopped => 2,
        }
    }

    /// Parses the HomeKit numeric value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for values above 2.
    pub fn from_num(value: u8) -> Result<Self, ValueError> {
        match value {
            0 => Ok(Self::Decreasing),
            1 => Ok(Self::Increasing),
            2 => Ok(Self::Stopped),
            _ => Err(ValueError::OutOfRange {
                min: 0,
                max: 2,
                actual: u16::from(value),
            }),
        }
    }

    /// The state of a covering moving from `current` to `target`.
    #[must_use]
    pub fn toward(current: Percent, target: Percent) -> Self {
        match target.cmp(&current) {
            std::cmp::Ordering::Greater => Self::Increasing,
            std::cmp::Ordering::Less => Self::Decreasing,
            std::cmp::Ordering::Equal => Self::Stopped,
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decreasing => f.write_str("closing"),
            Self::Increasing => f.write_str("opening"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}
