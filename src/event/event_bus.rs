// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for panel events.

use tokio::sync::broadcast;

use super::PanelEvent;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcasts [`PanelEvent`]s to any number of observers.
///
/// A slow observer that falls more than the channel capacity behind
/// receives `RecvError::Lagged` and misses the oldest events. The panel
/// snapshot is always authoritative, so a lagging observer can resync
/// from [`HeaterController::panel`](crate::HeaterController::panel).
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    /// Creates a bus with the default capacity (256).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus that buffers up to `capacity` events per observer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event. Without observers the event is discarded.
    pub fn publish(&self, event: PanelEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
