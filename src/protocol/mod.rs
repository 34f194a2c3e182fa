// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports that carry commands to the heater.
//!
//! # Transports
//!
//! - [`MqttTransport`]: a broker connection over TCP, TLS or WebSocket
//! - [`MemoryTransport`]: records publications in memory, for tests and
//!   offline front ends

mod memory;
#[cfg(feature = "mqtt")]
mod mqtt;

pub use memory::MemoryTransport;
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttTransport, MqttTransportBuilder};

use std::future::Future;

use crate::command::{Command, Publication};
use crate::error::ProtocolError;

/// A message received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Full topic.
    pub topic: String,
    /// Payload decoded as UTF-8 (lossy).
    pub payload: String,
}

impl IncomingMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Something that can deliver publications to the device.
pub trait Transport: Send + Sync + 'static {
    /// Publishes one message.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message cannot be queued for delivery.
    fn publish(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Encodes and publishes a command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message cannot be queued for delivery.
    fn send_command<C: Command>(
        &self,
        command: &C,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send {
        self.publish(command.to_publication())
    }
}
