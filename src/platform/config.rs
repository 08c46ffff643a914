// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration of the Flair platform block.
///
/// Every field has a default, so an empty JSON object is a valid
/// configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use flair_bridge::platform::PlatformConfig;
///
/// let config = PlatformConfig::from_json(r#"{"vents": false, "commandTimeoutMs": 2500}"#).unwrap();
/// assert!(config.pucks);
/// assert!(!config.vents);
/// assert_eq!(config.command_timeout(), Duration::from_millis(2500));
///
/// let config = PlatformConfig::default().with_event_capacity(64);
/// assert_eq!(config.event_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    /// Platform name shown in host logs.
    pub name: String,
    /// Expose pucks.
    pub pucks: bool,
    /// Expose vents.
    pub vents: bool,
    /// Bound on each vent position command, in milliseconds.
    pub command_timeout_ms: u64,
    /// Capacity of the event channel.
    pub event_capacity: usize,
}

impl PlatformConfig {
    /// Default platform name.
    pub const DEFAULT_NAME: &'static str = "Flair";
    /// Default vent command timeout.
    pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;
    /// Default event channel capacity.
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;

    /// Parses the platform block from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Validation` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for a zero command timeout or a
    /// zero event capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "commandTimeoutMs must be greater than 0".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Validation(
                "eventCapacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Sets the platform name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables pucks.
    #[must_use]
    pub fn with_pucks(mut self, enabled: bool) -> Self {
        self.pucks = enabled;
        self
    }

    /// Enables or disables vents.
    #[must_use]
    pub fn with_vents(mut self, enabled: bool) -> Self {
        self.vents = enabled;
        self
    }

    /// Sets the vent command timeout.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Vent command timeout as a duration.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            pucks: true,
            vents: true,
            command_timeout_ms: Self::DEFAULT_COMMAND_TIMEOUT_MS,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}
