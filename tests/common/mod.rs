// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use flair_bridge::device::{Puck, Vent};
use flair_bridge::error::RemoteError;
use flair_bridge::types::{Humidity, Percent, Temperature};
use flair_bridge::FlairApi;
use parking_lot::Mutex;

/// Scripted reply to a vent command.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Confirm the requested position.
    Confirm,
    /// Confirm a different position than requested.
    ConfirmAt(u8),
    /// Reject the command.
    Reject(&'static str),
    /// Never answer.
    Hang,
}

/// Flair API fake with scripted listings and command replies.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    pucks: Mutex<Option<Vec<Puck>>>,
    vents: Mutex<Option<Vec<Vent>>>,
    replies: Mutex<VecDeque<(Duration, Reply)>>,
    commands: Mutex<Vec<(String, Percent)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pucks(self, pucks: Vec<Puck>) -> Self {
        self.set_pucks(Some(pucks));
        self
    }

    pub fn with_vents(self, vents: Vec<Vent>) -> Self {
        self.set_vents(Some(vents));
        self
    }

    /// `None` makes the listing fail.
    pub fn set_pucks(&self, pucks: Option<Vec<Puck>>) {
        *self.pucks.lock() = pucks;
    }

    /// `None` makes the listing fail.
    pub fn set_vents(&self, vents: Option<Vec<Vent>>) {
        *self.vents.lock() = vents;
    }

    pub fn reply(&self, reply: Reply) {
        self.reply_after(Duration::ZERO, reply);
    }

    pub fn reply_after(&self, delay: Duration, reply: Reply) {
        self.replies.lock().push_back((delay, reply));
    }

    pub fn commands(&self) -> Vec<(String, Percent)> {
        self.commands.lock().clone()
    }
}

impl FlairApi for ScriptedClient {
    async fn list_pucks(&self) -> Result<Vec<Puck>, RemoteError> {
        let pucks = self.pucks.lock().clone();
        pucks.ok_or_else(|| RemoteError::Unavailable("pucks listing failed".into()))
    }

    async fn list_vents(&self) -> Result<Vec<Vent>, RemoteError> {
        let vents = self.vents.lock().clone();
        vents.ok_or_else(|| RemoteError::Unavailable("vents listing failed".into()))
    }

    async fn set_vent_percent_open(
        &self,
        vent_id: &str,
        percent: Percent,
    ) -> Result<Vent, RemoteError> {
        self.commands.lock().push((vent_id.to_string(), percent));
        let next = self.replies.lock().pop_front();
        let (delay, reply) = next.unwrap_or((Duration::ZERO, Reply::Confirm));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Confirm => Ok(Vent::new(vent_id, vent_id, percent)),
            Reply::ConfirmAt(actual) => Ok(Vent::new(vent_id, vent_id, Percent::clamped(actual))),
            Reply::Reject(reason) => Err(RemoteError::CommandRejected(reason.to_string())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn puck(id: &str, name: &str, display_number: &str, celsius: f64, humidity: f64) -> Puck {
    Puck::new(
        id,
        name,
        display_number,
        Temperature::celsius(celsius).unwrap(),
        Humidity::new(humidity).unwrap(),
    )
}

pub fn vent(id: &str, name: &str, percent_open: u8) -> Vent {
    Vent::new(id, name, Percent::new(percent_open).unwrap())
}
