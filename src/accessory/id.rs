// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory and service identifier types.

use std::fmt;

use uuid::Uuid;

/// Namespace for accessory ids derived from Flair device ids.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x5f1a_1e2b_7c3d_4e8f_9a0b_1c2d_3e4f_5a6b);

/// Stable identifier of an accessory in the host registry.
///
/// Accessories for Flair devices are identified by a name-based UUID
/// derived from the device id, so the same physical device maps to the
/// same cached accessory across restarts.
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::AccessoryId;
///
/// let a = AccessoryId::for_device("v1");
/// let b = AccessoryId::for_device("v1");
/// assert_eq!(a, b);
/// assert_ne!(a, AccessoryId::for_device("v2"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Derives the accessory id for a Flair device id.
    #[must_use]
    pub fn for_device(device_id: &str) -> Self {
        Self(Uuid::new_v5(&ACCESSORY_NAMESPACE, device_id.as_bytes()))
    }

    /// Creates an accessory identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only first 8 characters for readability
        let short = &self.0.to_string()[..8];
        write!(f, "AccessoryId({short}...)")
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a service attached to an accessory.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Creates a new random service identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0.to_string()[..8];
        write!(f, "ServiceId({short}...)")
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
