// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory object model shared with the host registry.
//!
//! An accessory is addressed by its [`AccessoryId`] and owns zero or more
//! services, each identified by a [`ServiceHandle`]. Services expose
//! [`Characteristic`]s holding [`CharacteristicValue`]s. The storage of this
//! graph belongs to the host; see [`crate::registry`].

mod characteristic;
mod id;
mod service;

pub use characteristic::{Characteristic, CharacteristicValue, Format, MAX_STRING_LEN};
pub use id::{AccessoryId, ServiceId};
pub use service::{ServiceHandle, ServiceKind};
