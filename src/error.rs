// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Flair bridge.
//!
//! The hierarchy mirrors the layers of the crate: value validation for
//! snapshots, the accessory registry port, binding construction, the remote
//! Flair API port, and platform configuration.

use thiserror::Error;

use crate::accessory::{AccessoryId, Characteristic, ServiceId, ServiceKind};
use crate::device::DeviceKind;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A device reported a value outside its legal range.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A binding could not be constructed.
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    /// The accessory registry rejected an operation.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The remote API failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The platform configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A vent position command was rejected or timed out.
    ///
    /// The vent's characteristics have already been reverted to the last
    /// confirmed position when this error is reported.
    #[error("position command for vent {device_id} failed: {source}")]
    RemoteCommandFailure {
        /// Flair identifier of the vent.
        device_id: String,
        /// Underlying remote failure.
        #[source]
        source: RemoteError,
    },

    /// No binding exists for the accessory.
    #[error("accessory {0} is not bound")]
    NotBound(AccessoryId),

    /// A vent command was issued outside a tokio runtime.
    #[error("no tokio runtime available to send the command")]
    NoRuntime,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A temperature reading is NaN or infinite.
    #[error("temperature must be finite, got {0}")]
    NonFiniteTemperature(f64),

    /// A relative humidity reading is outside [0, 100].
    #[error("humidity {0} is out of range [0, 100]")]
    HumidityOutOfRange(f64),

    /// A required attribute was absent from the device report.
    #[error("missing field in device report: {0}")]
    MissingField(&'static str),

    /// A device report had an unexpected resource type.
    #[error("unexpected resource type: {0}")]
    UnexpectedType(String),
}

/// Errors reported by an [`AccessoryRegistry`](crate::registry::AccessoryRegistry).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    /// The accessory is not known to the registry.
    #[error("unknown accessory {0}")]
    UnknownAccessory(AccessoryId),

    /// The service is not attached to the accessory.
    #[error("unknown service {0}")]
    UnknownService(ServiceId),

    /// A service with the same kind and subtype already exists.
    #[error("service {kind} with subtype {subtype:?} already exists")]
    DuplicateService {
        /// Kind of the colliding service.
        kind: ServiceKind,
        /// Subtype of the colliding service.
        subtype: Option<String>,
    },

    /// The host cannot create services of this kind.
    #[error("service {0} is not supported by the host")]
    UnsupportedService(ServiceKind),

    /// The characteristic does not belong to the service kind.
    #[error("{characteristic} is not a characteristic of {kind}")]
    UnsupportedCharacteristic {
        /// Kind of the target service.
        kind: ServiceKind,
        /// The rejected characteristic.
        characteristic: Characteristic,
    },

    /// The value does not match the characteristic's format or range.
    #[error("invalid value for {characteristic}: {reason}")]
    InvalidValue {
        /// The characteristic being written.
        characteristic: Characteristic,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while constructing a binding.
///
/// All of these abort the binding of one device before any characteristic
/// is seeded.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindingError {
    /// Two services of the same kind exist or would exist without a
    /// distinguishing subtype.
    #[error("conflicting {kind} services (subtype {subtype:?})")]
    ServiceConflict {
        /// Kind of the conflicting service.
        kind: ServiceKind,
        /// Subtype that was requested.
        subtype: Option<String>,
    },

    /// The host refused to create a service the device kind requires.
    #[error("host cannot provide required {kind} service")]
    MissingRequiredService {
        /// The required service kind.
        kind: ServiceKind,
    },

    /// The snapshot does not describe the kind of device being bound.
    #[error("expected a {expected} snapshot, got {actual}")]
    WrongDeviceKind {
        /// Kind the binding handles.
        expected: DeviceKind,
        /// Kind of the supplied snapshot.
        actual: DeviceKind,
    },

    /// A projected value would violate the characteristic's contract.
    #[error("invalid value for {characteristic}: {reason}")]
    InvalidCharacteristic {
        /// The characteristic being seeded.
        characteristic: Characteristic,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors from the remote Flair API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The API refused the command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The API could not be reached.
    #[error("API unavailable: {0}")]
    Unavailable(String),

    /// The API answered with an unreadable document.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a device report that failed validation.
    #[error("invalid device report: {0}")]
    InvalidReport(#[from] ValueError),
}

/// Errors in the platform configuration block.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration JSON could not be parsed.
    #[error("failed to parse platform config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_binding_error() {
        let err: Error = BindingError::MissingRequiredService {
            kind: ServiceKind::WindowCovering,
        }
        .into();
        assert!(matches!(
            err,
            Error::Binding(BindingError::MissingRequiredService {
                kind: ServiceKind::WindowCovering
            })
        ));
    }

    #[test]
    fn service_conflict_display() {
        let err = BindingError::ServiceConflict {
            kind: ServiceKind::TemperatureSensor,
            subtype: None,
        };
        assert_eq!(
            err.to_string(),
            "conflicting TemperatureSensor services (subtype None)"
        );
    }

    #[test]
    fn remote_command_failure_keeps_source() {
        let err = Error::RemoteCommandFailure {
            device_id: "v1".to_string(),
            source: RemoteError::Timeout(10_000),
        };
        assert_eq!(
            err.to_string(),
            "position command for vent v1 failed: request timed out after 10000 ms"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
