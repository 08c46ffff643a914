// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of Flair API JSON:API documents into snapshots.
//!
//! The Flair API wraps every device in a resource object:
//!
//! ```json
//! {
//!   "id": "v1",
//!   "type": "vents",
//!   "attributes": { "name": "Living Room Vent", "percent-open": 42 }
//! }
//! ```
//!
//! Listing endpoints return `{"data": [ ...resources ]}`. Attribute values
//! are validated into the crate's value types after deserialization, so a
//! parsed snapshot always satisfies its invariants.

use serde::Deserialize;

use crate::error::{RemoteError, ValueError};
use crate::types::{Humidity, Percent, Temperature};

use super::{DeviceSnapshot, Puck, Vent};

#[derive(Debug, Deserialize)]
struct Document {
    data: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct SingleDocument {
    data: Resource,
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    attributes: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct PuckAttributes {
    name: Option<String>,
    display_number: Option<String>,
    current_temperature_c: Option<f64>,
    current_humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct VentAttributes {
    name: Option<String>,
    percent_open: Option<u8>,
    duct_temperature_c: Option<f64>,
}

impl Resource {
    fn into_snapshot(self) -> Result<DeviceSnapshot, RemoteError> {
        match self.kind.as_str() {
            "pucks" => {
                let attributes: PuckAttributes = serde_json::from_value(self.attributes)?;
                Ok(DeviceSnapshot::Puck(puck_from(self.id, attributes)?))
            }
            "vents" => {
                let attributes: VentAttributes = serde_json::from_value(self.attributes)?;
                Ok(DeviceSnapshot::Vent(vent_from(self.id, attributes)?))
            }
            other => Err(ValueError::UnexpectedType(other.to_string()).into()),
        }
    }
}

fn puck_from(id: String, attributes: PuckAttributes) -> Result<Puck, ValueError> {
    let display_number = attributes
        .display_number
        .filter(|n| !n.is_empty())
        .ok_or(ValueError::MissingField("display-number"))?;
    let temperature = attributes
        .current_temperature_c
        .ok_or(ValueError::MissingField("current-temperature-c"))
        .and_then(Temperature::celsius)?;
    let humidity = attributes
        .current_humidity
        .ok_or(ValueError::MissingField("current-humidity"))
        .and_then(Humidity::new)?;
    // Pucks without a configured name are labelled by their printed number.
    let name = attributes
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| display_number.clone());

    Ok(Puck::new(id, name, display_number, temperature, humidity))
}

fn vent_from(id: String, attributes: VentAttributes) -> Result<Vent, ValueError> {
    let percent_open = attributes
        .percent_open
        .ok_or(ValueError::MissingField("percent-open"))
        .and_then(Percent::new)?;
    let name = attributes
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| id.clone());

    let vent = Vent::new(id, name, percent_open);
    match attributes.duct_temperature_c {
        Some(celsius) => Ok(vent.with_duct_temperature(Temperature::celsius(celsius)?)),
        None => Ok(vent),
    }
}

/// Parses a single resource object or a `{"data": {...}}` document.
///
/// # Errors
///
/// Returns `RemoteError::Parse` for malformed JSON and
/// `RemoteError::InvalidReport` when attributes are missing or out of range.
pub fn parse_snapshot(json: &str) -> Result<DeviceSnapshot, RemoteError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let resource: Resource = if value.get("data").is_some() {
        serde_json::from_value::<SingleDocument>(value)?.data
    } else {
        serde_json::from_value(value)?
    };
    resource.into_snapshot()
}

/// A resource left out of a listing: its id and why it was rejected.
pub type Rejected = (String, RemoteError);

/// Parses a listing document into snapshots.
///
/// Each resource is parsed on its own. A resource that cannot be parsed is
/// logged and left out, so one faulty device never hides the others.
///
/// # Errors
///
/// Returns `RemoteError::Parse` only when the document itself is malformed.
pub fn parse_document(json: &str) -> Result<Vec<DeviceSnapshot>, RemoteError> {
    Ok(parse_listing(json)?.0)
}

/// Parses a listing document, returning the rejected resources alongside
/// the parsed snapshots.
///
/// # Errors
///
/// Returns `RemoteError::Parse` only when the document itself is malformed.
pub fn parse_listing(json: &str) -> Result<(Vec<DeviceSnapshot>, Vec<Rejected>), RemoteError> {
    let document: Document = serde_json::from_str(json)?;
    let mut snapshots = Vec::with_capacity(document.data.len());
    let mut rejected = Vec::new();

    for resource in document.data {
        let id = resource.id.clone();
        match resource.into_snapshot() {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(error) => {
                tracing::warn!(device_id = %id, %error, "Skipping invalid resource");
                rejected.push((id, error));
            }
        }
    }
    Ok((snapshots, rejected))
}

/// Parses a listing document into pucks.
///
/// Resources that are not valid pucks are logged and skipped.
///
/// # Errors
///
/// Returns `RemoteError::Parse` only when the document itself is malformed.
pub fn parse_pucks(json: &str) -> Result<Vec<Puck>, RemoteError> {
    Ok(parse_document(json)?
        .into_iter()
        .filter_map(|snapshot| match snapshot {
            DeviceSnapshot::Puck(puck) => Some(puck),
            DeviceSnapshot::Vent(vent) => {
                tracing::warn!(device_id = vent.id(), "Skipping vent in puck listing");
                None
            }
        })
        .collect())
}

/// Parses a listing document into vents.
///
/// Resources that are not valid vents are logged and skipped.
///
/// # Errors
///
/// Returns `RemoteError::Parse` only when the document itself is malformed.
pub fn parse_vents(json: &str) -> Result<Vec<Vent>, RemoteError> {
    Ok(parse_document(json)?
        .into_iter()
        .filter_map(|snapshot| match snapshot {
            DeviceSnapshot::Vent(vent) => Some(vent),
            DeviceSnapshot::Puck(puck) => {
                tracing::warn!(device_id = puck.id(), "Skipping puck in vent listing");
                None
            }
        })
        .collect())
}
