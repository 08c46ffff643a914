// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Idempotent service resolution.

use crate::accessory::{AccessoryId, ServiceHandle, ServiceKind};
use crate::error::{BindingError, Error, RegistryError, Result};
use crate::registry::AccessoryRegistry;

/// Guarantees that a service of a kind exists exactly once on an accessory.
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::{AccessoryId, ServiceKind};
/// use flair_bridge::binding::ServiceResolver;
/// use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
///
/// let registry = MemoryRegistry::new();
/// let accessory = AccessoryId::for_device("p1");
/// registry.ensure_accessory(accessory, "Bedroom").unwrap();
///
/// let resolver = ServiceResolver::new(&registry);
/// let first = resolver.resolve(accessory, ServiceKind::TemperatureSensor).unwrap();
/// let second = resolver.resolve(accessory, ServiceKind::TemperatureSensor).unwrap();
/// assert_eq!(first.id(), second.id());
/// ```
#[derive(Debug)]
pub struct ServiceResolver<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: AccessoryRegistry + ?Sized> ServiceResolver<'r, R> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Returns the subtype-less service of `kind`, adding it if absent.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::ServiceConflict` if the accessory already
    /// holds several matching services, `BindingError::MissingRequiredService`
    /// if the host cannot provide the kind, or a registry error otherwise.
    pub fn resolve(&self, accessory: AccessoryId, kind: ServiceKind) -> Result<ServiceHandle> {
        self.resolve_with_subtype(accessory, kind, None)
    }

    /// Returns the service of `kind` with `subtype`, adding it if absent.
    ///
    /// `None` matches only services without a subtype.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_with_subtype(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Result<ServiceHandle> {
        let mut matching = self
            .registry
            .services(accessory)?
            .into_iter()
            .filter(|service| service.matches(kind, subtype));

        match (matching.next(), matching.next()) {
            (Some(service), None) => {
                tracing::debug!(%accessory, %kind, service = %service.id(), "Reusing service");
                Ok(service)
            }
            (Some(_), Some(_)) => Err(conflict(kind, subtype)),
            (None, _) => self.add(accessory, kind, subtype),
        }
    }

    fn add(
        &self,
        accessory: AccessoryId,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Result<ServiceHandle> {
        match self.registry.add_service(accessory, kind, subtype) {
            Ok(service) => {
                tracing::debug!(%accessory, %kind, service = %service.id(), "Added service");
                Ok(service)
            }
            Err(RegistryError::DuplicateService { .. }) => Err(conflict(kind, subtype)),
            Err(RegistryError::UnsupportedService(_)) => {
                Err(BindingError::MissingRequiredService { kind }.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn conflict(kind: ServiceKind, subtype: Option<&str>) -> Error {
    BindingError::ServiceConflict {
        kind,
        subtype: subtype.map(str::to_string),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    fn setup(registry: &MemoryRegistry) -> AccessoryId {
        let accessory = AccessoryId::for_device("v1");
        registry.ensure_accessory(accessory, "Vent").unwrap();
        accessory
    }

    #[test]
    fn resolve_is_idempotent() {
        let registry = MemoryRegistry::new();
        let accessory = setup(&registry);
        let resolver = ServiceResolver::new(&registry);

        let first = resolver
            .resolve(accessory, ServiceKind::WindowCovering)
            .unwrap();
        let second = resolver
            .resolve(accessory, ServiceKind::WindowCovering)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.services(accessory).unwrap().len(), 2);
    }

    #[test]
    fn resolve_existing_information_service() {
        let registry = MemoryRegistry::new();
        let accessory = setup(&registry);

        let info = ServiceResolver::new(&registry)
            .resolve(accessory, ServiceKind::AccessoryInformation)
            .unwrap();
        assert_eq!(info.kind(), ServiceKind::AccessoryInformation);
        assert_eq!(registry.services(accessory).unwrap().len(), 1);
    }

    #[test]
    fn subtypes_resolve_to_distinct_services() {
        let registry = MemoryRegistry::new();
        let accessory = setup(&registry);
        let resolver = ServiceResolver::new(&registry);

        let plain = resolver
            .resolve(accessory, ServiceKind::TemperatureSensor)
            .unwrap();
        let duct = resolver
            .resolve_with_subtype(accessory, ServiceKind::TemperatureSensor, Some("duct"))
            .unwrap();

        assert_ne!(plain.id(), duct.id());
        assert_eq!(duct.subtype(), Some("duct"));
    }

    #[test]
    fn duplicated_cache_is_a_conflict() {
        let registry = MemoryRegistry::new();
        let accessory = setup(&registry);
        registry
            .restore_service(accessory, ServiceKind::WindowCovering, None)
            .unwrap();
        registry
            .restore_service(accessory, ServiceKind::WindowCovering, None)
            .unwrap();

        let err = ServiceResolver::new(&registry)
            .resolve(accessory, ServiceKind::WindowCovering)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::ServiceConflict {
                kind: ServiceKind::WindowCovering,
                subtype: None,
            })
        ));
    }

    #[test]
    fn refused_kind_is_missing_required_service() {
        let registry = MemoryRegistry::with_unsupported([ServiceKind::HumiditySensor]);
        let accessory = setup(&registry);

        let err = ServiceResolver::new(&registry)
            .resolve(accessory, ServiceKind::HumiditySensor)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::MissingRequiredService {
                kind: ServiceKind::HumiditySensor
            })
        ));
    }

    #[test]
    fn unknown_accessory_is_a_registry_error() {
        let registry = MemoryRegistry::new();
        let err = ServiceResolver::new(&registry)
            .resolve(AccessoryId::for_device("ghost"), ServiceKind::WindowCovering)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::UnknownAccessory(_))
        ));
    }
}
