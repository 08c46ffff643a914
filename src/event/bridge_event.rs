// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge event types.

use crate::accessory::AccessoryId;
use crate::device::DeviceKind;
use crate::registry::AccessoryOrigin;
use crate::types::Percent;

/// Events emitted by the platform and by vent bindings.
///
/// Errors are carried as rendered messages so events stay cheap to clone
/// for every subscriber.
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::AccessoryId;
/// use flair_bridge::event::BridgeEvent;
/// use flair_bridge::types::Percent;
///
/// let accessory = AccessoryId::for_device("v1");
/// let confirmed = BridgeEvent::PositionConfirmed {
///     accessory,
///     device_id: "v1".into(),
///     position: Percent::new(60).unwrap(),
/// };
/// assert_eq!(confirmed.accessory(), accessory);
/// assert!(confirmed.is_position());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A device was bound to its accessory.
    AccessoryBound {
        /// The bound accessory.
        accessory: AccessoryId,
        /// Flair resource id.
        device_id: String,
        /// Kind of the device.
        kind: DeviceKind,
        /// Whether the accessory came from the host cache.
        origin: AccessoryOrigin,
    },

    /// A device could not be bound and was skipped.
    BindFailed {
        /// The accessory the device maps to.
        accessory: AccessoryId,
        /// Flair resource id.
        device_id: String,
        /// Why binding failed.
        error: String,
    },

    /// An accessory was unregistered because its device disappeared.
    AccessoryRemoved {
        /// The removed accessory.
        accessory: AccessoryId,
    },

    /// A vent confirmed a position command.
    PositionConfirmed {
        /// The vent accessory.
        accessory: AccessoryId,
        /// Flair resource id.
        device_id: String,
        /// Position reported by the API.
        position: Percent,
    },

    /// A vent position command failed and the accessory was reverted.
    PositionCommandFailed {
        /// The vent accessory.
        accessory: AccessoryId,
        /// Flair resource id.
        device_id: String,
        /// Last confirmed position the accessory reverted to.
        reverted_to: Percent,
        /// Why the command failed.
        error: String,
    },
}

impl BridgeEvent {
    /// Returns the accessory associated with this event.
    #[must_use]
    pub fn accessory(&self) -> AccessoryId {
        match self {
            Self::AccessoryBound { accessory, .. }
            | Self::BindFailed { accessory, .. }
            | Self::AccessoryRemoved { accessory }
            | Self::PositionConfirmed { accessory, .. }
            | Self::PositionCommandFailed { accessory, .. } => *accessory,
        }
    }

    /// Returns `true` for discovery lifecycle events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::AccessoryBound { .. } | Self::BindFailed { .. } | Self::AccessoryRemoved { .. }
        )
    }

    /// Returns `true` for vent command outcomes.
    #[must_use]
    pub fn is_position(&self) -> bool {
        matches!(
            self,
            Self::PositionConfirmed { .. } | Self::PositionCommandFailed { .. }
        )
    }

    /// Creates an accessory removed event.
    #[must_use]
    pub fn removed(accessory: AccessoryId) -> Self {
        Self::AccessoryRemoved { accessory }
    }
}
