// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for bridge events.

use tokio::sync::broadcast;

use super::BridgeEvent;

/// Fan-out of [`BridgeEvent`]s from the platform and its vent bindings.
///
/// Every clone feeds the same channel. The platform sizes it from
/// `PlatformConfig::event_capacity`; a subscriber that falls further behind
/// than that receives `RecvError::Lagged` and misses the oldest events.
///
/// # Examples
///
/// ```
/// use flair_bridge::accessory::AccessoryId;
/// use flair_bridge::event::{BridgeEvent, EventBus};
///
/// let bus = EventBus::with_capacity(16);
/// let mut rx = bus.subscribe();
///
/// bus.publish(BridgeEvent::removed(AccessoryId::for_device("v1")));
/// assert!(rx.try_recv().unwrap().is_lifecycle());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `PlatformConfig::validate` rejects
    /// that value.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event; it is dropped when nobody is subscribed.
    pub fn publish(&self, event: BridgeEvent) {
        tracing::trace!(accessory = %event.accessory(), ?event, "Publishing bridge event");
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::AccessoryId;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    fn removed(device: &str) -> BridgeEvent {
        BridgeEvent::removed(AccessoryId::for_device(device))
    }

    #[tokio::test]
    async fn vent_binding_clone_reaches_platform_subscribers() {
        let platform_bus = EventBus::with_capacity(8);
        let vent_bus = platform_bus.clone();
        let mut first = platform_bus.subscribe();
        let mut second = platform_bus.subscribe();

        vent_bus.publish(removed("v1"));

        let expected = AccessoryId::for_device("v1");
        assert_eq!(first.recv().await.unwrap().accessory(), expected);
        assert_eq!(second.recv().await.unwrap().accessory(), expected);
    }

    #[test]
    fn events_before_subscribing_are_not_seen() {
        let bus = EventBus::with_capacity(8);
        bus.publish(removed("v1"));

        let mut rx = bus.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn slow_subscriber_lags() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for device in ["v1", "v2", "v3"] {
            bus.publish(removed(device));
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(
            rx.recv().await.unwrap().accessory(),
            AccessoryId::for_device("v2")
        );
    }
}
