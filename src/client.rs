// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Flair cloud API port.
//!
//! The crate does not own a transport. Hosts implement [`FlairApi`] over
//! their HTTP client of choice and can use the parsers in
//! [`device`](crate::device) to turn JSON:API responses into snapshots.

use std::future::Future;

use crate::device::{Puck, Vent};
use crate::error::RemoteError;
use crate::types::Percent;

/// Operations the bridge needs from the Flair cloud API.
///
/// Futures must be `Send`: vent commands are awaited on spawned tasks.
///
/// # Examples
///
/// ```
/// use flair_bridge::client::FlairApi;
/// use flair_bridge::device::{Puck, Vent, parse_vents};
/// use flair_bridge::error::RemoteError;
/// use flair_bridge::types::Percent;
///
/// struct Canned(&'static str);
///
/// impl FlairApi for Canned {
///     async fn list_pucks(&self) -> Result<Vec<Puck>, RemoteError> {
///         Ok(Vec::new())
///     }
///
///     async fn list_vents(&self) -> Result<Vec<Vent>, RemoteError> {
///         parse_vents(self.0)
///     }
///
///     async fn set_vent_percent_open(
///         &self,
///         vent_id: &str,
///         percent: Percent,
///     ) -> Result<Vent, RemoteError> {
///         Ok(Vent::new(vent_id, vent_id, percent))
///     }
/// }
/// ```
pub trait FlairApi: Send + Sync {
    /// Lists every puck of the structure.
    fn list_pucks(&self) -> impl Future<Output = Result<Vec<Puck>, RemoteError>> + Send;

    /// Lists every vent of the structure.
    fn list_vents(&self) -> impl Future<Output = Result<Vec<Vent>, RemoteError>> + Send;

    /// Commands a vent to `percent` open.
    ///
    /// Resolves to the vent state confirmed by the API, which may differ
    /// from the request.
    fn set_vent_percent_open(
        &self,
        vent_id: &str,
        percent: Percent,
    ) -> impl Future<Output = Result<Vent, RemoteError>> + Send;
}
