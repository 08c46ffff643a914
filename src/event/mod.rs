// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge events.
//!
//! Discovery results and vent command outcomes are reported upward through
//! an [`EventBus`] built on tokio's broadcast channel. Failures never
//! propagate as errors out of background tasks; subscribers observe them
//! as [`BridgeEvent::BindFailed`] and [`BridgeEvent::PositionCommandFailed`].

mod bridge_event;
mod event_bus;

pub use bridge_event::BridgeEvent;
pub use event_bus::EventBus;
