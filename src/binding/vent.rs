// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vent binding and position write-back.
//!
//! A controller SET on `TargetPosition` goes through
//! [`VentBinding::set_target_position`]:
//!
//! 1. `TargetPosition` and `PositionState` are written immediately, so the
//!    controller sees the vent opening or closing;
//! 2. the command is sent to the Flair API on a spawned task, bounded by the
//!    command timeout;
//! 3. the completion reconciles the accessory to the confirmed position, or
//!    reverts it to the last confirmed one on failure.
//!
//! At most one command per vent is in flight. A newer command aborts the
//! older task and bumps the vent's generation; a completion carrying a
//! stale generation is discarded.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::accessory::{AccessoryId, Characteristic, ServiceHandle, ServiceKind};
use crate::client::FlairApi;
use crate::device::{DeviceSnapshot, Vent};
use crate::error::{Error, RegistryError, RemoteError, Result, ValueError};
use crate::event::{BridgeEvent, EventBus};
use crate::registry::AccessoryRegistry;
use crate::types::{Percent, PositionState};

use super::puck::required;
use super::{Binding, BoundAccessory, VENT_PROFILE};

/// Default bound on a vent position command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// How a position command ended.
#[derive(Debug)]
pub enum CommandOutcome {
    /// The API confirmed the vent at this position.
    Confirmed(Percent),
    /// The command failed; the accessory was reverted to `position`.
    Reverted {
        /// Last confirmed position.
        position: Percent,
        /// Always `Error::RemoteCommandFailure`.
        error: Error,
    },
    /// A newer command or a cancellation replaced this one.
    Superseded,
}

impl CommandOutcome {
    /// Returns `true` if the API confirmed the command.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Handle on a dispatched position command.
#[derive(Debug)]
pub struct CommandTicket {
    generation: u64,
    receiver: oneshot::Receiver<CommandOutcome>,
}

impl CommandTicket {
    /// Generation the command was issued with.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the command to complete.
    ///
    /// Commands aborted before completing resolve to
    /// [`CommandOutcome::Superseded`].
    pub async fn outcome(self) -> CommandOutcome {
        self.receiver.await.unwrap_or(CommandOutcome::Superseded)
    }
}

#[derive(Debug)]
struct CommandState {
    generation: u64,
    last_confirmed: Percent,
    confirmed_at: Option<DateTime<Utc>>,
    in_flight: Option<JoinHandle<()>>,
}

/// A vent bound to its accessory, with the position write-back path.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use flair_bridge::accessory::AccessoryId;
/// use flair_bridge::binding::VentBinding;
/// use flair_bridge::client::FlairApi;
/// use flair_bridge::device::Vent;
/// use flair_bridge::registry::{AccessoryRegistry, MemoryRegistry};
/// use flair_bridge::types::Percent;
///
/// async fn open_fully<C>(client: Arc<C>, vent: &Vent) -> flair_bridge::Result<()>
/// where
///     C: FlairApi + 'static,
/// {
///     let registry = Arc::new(MemoryRegistry::new());
///     let accessory = AccessoryId::for_device(vent.id());
///     registry.ensure_accessory(accessory, vent.name())?;
///
///     let binding = VentBinding::bind(registry, client, accessory, vent)?
///         .with_command_timeout(Duration::from_secs(5));
///     let outcome = binding.set_target_position(Percent::OPEN)?.outcome().await;
///     assert!(outcome.is_confirmed());
///     Ok(())
/// }
/// ```
pub struct VentBinding<R, C> {
    registry: Arc<R>,
    client: Arc<C>,
    device_id: String,
    bound: BoundAccessory,
    covering: ServiceHandle,
    temperature: ServiceHandle,
    timeout: Duration,
    events: Option<EventBus>,
    state: Arc<Mutex<CommandState>>,
}

impl<R, C> VentBinding<R, C>
where
    R: AccessoryRegistry + 'static,
    C: FlairApi + 'static,
{
    /// Binds `vent` onto `accessory`.
    ///
    /// The reported opening becomes the last confirmed position.
    ///
    /// # Errors
    ///
    /// See [`Binding::bind`].
    pub fn bind(
        registry: Arc<R>,
        client: Arc<C>,
        accessory: AccessoryId,
        vent: &Vent,
    ) -> Result<Self> {
        let snapshot = DeviceSnapshot::Vent(vent.clone());
        let bound = Binding::new(&VENT_PROFILE).bind(registry.as_ref(), accessory, &snapshot)?;

        let covering = required(&bound, ServiceKind::WindowCovering)?;
        let temperature = required(&bound, ServiceKind::TemperatureSensor)?;

        Ok(Self {
            registry,
            client,
            device_id: vent.id().to_string(),
            bound,
            covering,
            temperature,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            events: None,
            state: Arc::new(Mutex::new(CommandState {
                generation: 0,
                last_confirmed: vent.percent_open(),
                confirmed_at: None,
                in_flight: None,
            })),
        })
    }

    /// Sets the bound on each position command.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publishes command outcomes on `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Handles a controller SET on `TargetPosition`.
    ///
    /// Returns once the target is visible on the accessory; the command
    /// itself completes in the background and is observed through the
    /// returned ticket or the event bus.
    ///
    /// # Errors
    ///
    /// - `Error::NoRuntime` if called outside a tokio runtime; nothing is
    ///   written in that case
    /// - a registry error if the accessory cannot be updated; the previous
    ///   command, if any, keeps running in that case
    pub fn set_target_position(&self, target: Percent) -> Result<CommandTicket> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let mut state = self.state.lock();

        let current = self.current_position()?;
        let movement = PositionState::toward(current, target);
        self.registry
            .set_characteristic(&self.covering, Characteristic::TargetPosition, target.into())?;
        self.registry.update_characteristic(
            &self.covering,
            Characteristic::PositionState,
            movement.into(),
        )?;

        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.in_flight.take() {
            previous.abort();
            tracing::debug!(
                device_id = %self.device_id,
                generation,
                "Superseded in-flight position command"
            );
        }

        let (sender, receiver) = oneshot::channel();
        let command = PositionCommand {
            registry: Arc::clone(&self.registry),
            client: Arc::clone(&self.client),
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            device_id: self.device_id.clone(),
            accessory: self.accessory(),
            covering: self.covering.clone(),
            timeout: self.timeout,
            generation,
            target,
            sender,
        };

        tracing::debug!(
            device_id = %self.device_id,
            percent = target.value(),
            %movement,
            generation,
            "Dispatching position command"
        );
        state.in_flight = Some(runtime.spawn(command.run()));

        Ok(CommandTicket {
            generation,
            receiver,
        })
    }

    /// Aborts the in-flight command and restores the last confirmed
    /// position.
    ///
    /// Returns `true` if a command was pending.
    pub fn cancel_pending(&self) -> bool {
        let mut state = self.state.lock();
        let Some(task) = state.in_flight.take() else {
            return false;
        };

        task.abort();
        state.generation += 1;
        apply_position(
            self.registry.as_ref(),
            &self.covering,
            &self.device_id,
            state.last_confirmed,
        );
        tracing::debug!(device_id = %self.device_id, "Cancelled position command");
        true
    }
}

impl<R: AccessoryRegistry, C> VentBinding<R, C> {
    /// `CurrentPosition` as seen by controllers.
    ///
    /// # Errors
    ///
    /// Returns an error if the characteristic is unset or malformed.
    pub fn current_position(&self) -> Result<Percent> {
        Ok(Percent::new(self.read_u8(Characteristic::CurrentPosition)?)?)
    }

    /// `TargetPosition` as seen by controllers.
    ///
    /// # Errors
    ///
    /// Returns an error if the characteristic is unset or malformed.
    pub fn target_position(&self) -> Result<Percent> {
        Ok(Percent::new(self.read_u8(Characteristic::TargetPosition)?)?)
    }

    /// `PositionState` as seen by controllers.
    ///
    /// # Errors
    ///
    /// Returns an error if the characteristic is unset or malformed.
    pub fn position_state(&self) -> Result<PositionState> {
        Ok(PositionState::from_num(
            self.read_u8(Characteristic::PositionState)?,
        )?)
    }

    fn read_u8(&self, characteristic: Characteristic) -> Result<u8> {
        let value = self
            .registry
            .characteristic(&self.covering, characteristic)?
            .ok_or(ValueError::MissingField(characteristic.as_str()))?;
        value.as_u8().ok_or_else(|| {
            RegistryError::InvalidValue {
                characteristic,
                reason: format!("expected an integer, got {value}"),
            }
            .into()
        })
    }
}

impl<R, C> VentBinding<R, C> {
    /// Flair resource id of the vent.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The bound accessory.
    #[must_use]
    pub fn accessory(&self) -> AccessoryId {
        self.bound.accessory()
    }

    /// Services created or reused by the bind.
    #[must_use]
    pub fn bound(&self) -> &BoundAccessory {
        &self.bound
    }

    /// The window covering service.
    #[must_use]
    pub fn covering_service(&self) -> &ServiceHandle {
        &self.covering
    }

    /// The duct temperature sensor service.
    #[must_use]
    pub fn temperature_service(&self) -> &ServiceHandle {
        &self.temperature
    }

    /// Bound on each position command.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.timeout
    }

    /// Position last confirmed by the API, or reported at bind time.
    #[must_use]
    pub fn last_confirmed(&self) -> Percent {
        self.state.lock().last_confirmed
    }

    /// When the API last confirmed a command.
    #[must_use]
    pub fn last_confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().confirmed_at
    }

    /// Generation of the latest issued command; 0 before any.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Returns `true` while a command is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }
}

impl<R, C> fmt::Debug for VentBinding<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VentBinding")
            .field("device_id", &self.device_id)
            .field("accessory", &self.bound.accessory())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// One dispatched position command, owned by its task.
struct PositionCommand<R, C> {
    registry: Arc<R>,
    client: Arc<C>,
    state: Arc<Mutex<CommandState>>,
    events: Option<EventBus>,
    device_id: String,
    accessory: AccessoryId,
    covering: ServiceHandle,
    timeout: Duration,
    generation: u64,
    target: Percent,
    sender: oneshot::Sender<CommandOutcome>,
}

impl<R: AccessoryRegistry, C: FlairApi> PositionCommand<R, C> {
    async fn run(self) {
        let request = self.client.set_vent_percent_open(&self.device_id, self.target);
        let result = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(vent)) => Ok(vent.percent_open()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(RemoteError::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };

        let outcome = self.complete(result);
        // The ticket may have been dropped
        let _ = self.sender.send(outcome);
    }

    fn complete(&self, result: std::result::Result<Percent, RemoteError>) -> CommandOutcome {
        let mut state = self.state.lock();
        if state.generation != self.generation {
            tracing::debug!(
                device_id = %self.device_id,
                generation = self.generation,
                latest = state.generation,
                "Discarding stale position result"
            );
            return CommandOutcome::Superseded;
        }
        state.in_flight = None;

        match result {
            Ok(confirmed) => {
                state.last_confirmed = confirmed;
                state.confirmed_at = Some(Utc::now());
                apply_position(
                    self.registry.as_ref(),
                    &self.covering,
                    &self.device_id,
                    confirmed,
                );
                tracing::debug!(
                    device_id = %self.device_id,
                    percent = confirmed.value(),
                    "Position confirmed"
                );
                self.publish(BridgeEvent::PositionConfirmed {
                    accessory: self.accessory,
                    device_id: self.device_id.clone(),
                    position: confirmed,
                });
                CommandOutcome::Confirmed(confirmed)
            }
            Err(source) => {
                let position = state.last_confirmed;
                let error = Error::RemoteCommandFailure {
                    device_id: self.device_id.clone(),
                    source,
                };
                apply_position(
                    self.registry.as_ref(),
                    &self.covering,
                    &self.device_id,
                    position,
                );
                tracing::warn!(
                    device_id = %self.device_id,
                    percent = position.value(),
                    error = %error,
                    "Position command failed, reverted"
                );
                self.publish(BridgeEvent::PositionCommandFailed {
                    accessory: self.accessory,
                    device_id: self.device_id.clone(),
                    reverted_to: position,
                    error: error.to_string(),
                });
                CommandOutcome::Reverted { position, error }
            }
        }
    }

    fn publish(&self, event: BridgeEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

/// Pushes a resting position to controllers.
fn apply_position<R: AccessoryRegistry + ?Sized>(
    registry: &R,
    covering: &ServiceHandle,
    device_id: &str,
    position: Percent,
) {
    let updates = [
        (Characteristic::CurrentPosition, position.into()),
        (Characteristic::TargetPosition, position.into()),
        (Characteristic::PositionState, PositionState::Stopped.into()),
    ];
    for (characteristic, value) in updates {
        if let Err(e) = registry.update_characteristic(covering, characteristic, value) {
            tracing::warn!(%device_id, %characteristic, error = %e, "Failed to update vent");
        }
    }
}
