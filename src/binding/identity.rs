// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory identity stamping.

use crate::accessory::{AccessoryId, Characteristic, ServiceHandle, ServiceKind};
use crate::error::Result;
use crate::registry::AccessoryRegistry;

use super::ServiceResolver;

/// Manufacturer, model and serial number of an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'a> {
    /// Manufacturer name.
    pub manufacturer: &'a str,
    /// Model name.
    pub model: &'a str,
    /// Serial number.
    pub serial: &'a str,
}

/// Writes an [`Identity`] onto the `AccessoryInformation` service.
///
/// Stamping overwrites: the last identity written is the one visible.
#[derive(Debug)]
pub struct IdentityStamper<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: AccessoryRegistry + ?Sized> IdentityStamper<'r, R> {
    /// Creates a stamper over `registry`.
    #[must_use]
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Stamps `identity` on the accessory and returns its information service.
    ///
    /// # Errors
    ///
    /// Returns an error if the information service cannot be resolved or a
    /// string is rejected by the registry.
    pub fn stamp(&self, accessory: AccessoryId, identity: &Identity<'_>) -> Result<ServiceHandle> {
        let information = ServiceResolver::new(self.registry)
            .resolve(accessory, ServiceKind::AccessoryInformation)?;

        for (characteristic, value) in [
            (Characteristic::Manufacturer, identity.manufacturer),
            (Characteristic::Model, identity.model),
            (Characteristic::SerialNumber, identity.serial),
        ] {
            self.registry
                .set_characteristic(&information, characteristic, value.into())?;
        }

        Ok(information)
    }
}
