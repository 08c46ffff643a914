// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Flair device readings and vent control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so a snapshot that exists can always be projected onto HomeKit
//! characteristics.
//!
//! # Types
//!
//! - [`Percent`] - Vent opening (0-100%)
//! - [`Temperature`] - Finite temperature in degrees Celsius
//! - [`Humidity`] - Relative humidity (0-100%)
//! - [`PositionState`] - Closing/Opening/Stopped movement of a covering

mod climate;
mod percent;
mod position;

pub use climate::{Humidity, Temperature};
pub use percent::Percent;
pub use position::PositionState;
