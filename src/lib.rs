// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `flair_bridge` - Expose Flair Pucks and Vents as HomeKit accessories.
//!
//! This library maps the device model of the Flair cloud API onto the
//! services and characteristics of a HomeKit accessory host, and carries
//! vent position changes back to the API.
//!
//! # Supported Devices
//!
//! - **Pucks**: temperature and humidity sensors, exposed as a
//!   `TemperatureSensor` linked to a `HumiditySensor`
//! - **Vents**: motorized registers, exposed as a `WindowCovering` linked to
//!   the duct `TemperatureSensor`, with position write-back
//!
//! # Architecture
//!
//! - [`registry::AccessoryRegistry`] is the host's accessory graph, reached
//!   only through its capability set. [`registry::MemoryRegistry`] is an
//!   in-process implementation.
//! - [`client::FlairApi`] is the remote API. The crate owns no transport;
//!   [`device`] parses the API's JSON:API documents into snapshots.
//! - [`binding`] projects snapshots onto accessories, driven by per-kind
//!   profile tables.
//! - [`platform::FlairPlatform`] runs discovery and routes vent commands.
//!
//! # Quick Start
//!
//! ```
//! use flair_bridge::accessory::{AccessoryId, Characteristic, CharacteristicValue};
//! use flair_bridge::binding::PuckBinding;
//! use flair_bridge::device::{DeviceSnapshot, parse_snapshot};
//! use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
//!
//! # fn main() -> flair_bridge::Result<()> {
//! let registry = MemoryRegistry::new();
//! let snapshot = parse_snapshot(
//!     r#"{"id": "p1", "type": "pucks", "attributes": {
//!         "name": "Bedroom", "display-number": "PK-7",
//!         "current-temperature-c": 21.5, "current-humidity": 48
//!     }}"#,
//! )?;
//! let DeviceSnapshot::Puck(puck) = snapshot else { unreachable!() };
//!
//! let accessory = AccessoryId::for_device(puck.id());
//! registry.ensure_accessory(accessory, puck.name())?;
//! let binding = PuckBinding::bind(&registry, accessory, &puck)?;
//!
//! assert_eq!(
//!     registry.characteristic(binding.temperature_service(), Characteristic::CurrentTemperature)?,
//!     Some(CharacteristicValue::Float(21.5))
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod accessory;
pub mod binding;
pub mod client;
pub mod device;
pub mod error;
pub mod event;
pub mod platform;
pub mod registry;
pub mod types;

pub use accessory::{AccessoryId, Characteristic, CharacteristicValue, ServiceHandle, ServiceKind};
pub use binding::{
    Binding, BoundAccessory, CommandOutcome, CommandTicket, IdentityStamper, PuckBinding,
    ServiceResolver, VentBinding,
};
pub use client::FlairApi;
pub use device::{DeviceKind, DeviceSnapshot, Puck, Vent};
pub use error::{
    BindingError, ConfigError, Error, RegistryError, RemoteError, Result, ValueError,
};
pub use event::{BridgeEvent, EventBus};
pub use platform::{DiscoveryReport, FlairPlatform, PlatformConfig};
pub use registry::{AccessoryOrigin, AccessoryRegistry, MemoryRegistry};
pub use types::{Humidity, Percent, PositionState, Temperature};
