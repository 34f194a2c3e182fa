// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::Transport;
use crate::command::Publication;
use crate::error::ProtocolError;

/// Transport that keeps every publication in memory.
///
/// Clones share the same record, so a test can hand one clone to the
/// controller and inspect another.
///
/// # Examples
///
/// ```
/// use heater_control::command::StateCommand;
/// use heater_control::protocol::{MemoryTransport, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = MemoryTransport::new();
/// transport.send_command(&StateCommand::Update).await.unwrap();
///
/// let sent = transport.take();
/// assert_eq!(sent[0].topic, "heater/command/state");
/// assert_eq!(sent[0].payload, b"update");
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    published: Arc<Mutex<Vec<Publication>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far.
    #[must_use]
    pub fn published(&self) -> Vec<Publication> {
        self.published.lock().clone()
    }

    /// Returns everything published so far and clears the record.
    #[must_use]
    pub fn take(&self) -> Vec<Publication> {
        std::mem::take(&mut *self.published.lock())
    }

    /// Returns publications on `topic`, oldest first.
    #[must_use]
    pub fn published_on(&self, topic: &str) -> Vec<Publication> {
        self.published
            .lock()
            .iter()
            .filter(|p| p.topic == topic)
            .cloned()
            .collect()
    }

    /// Returns the number of publications recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().len()
    }

    /// Returns `true` if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.lock().is_empty()
    }

    /// Makes subsequent publishes fail with `ProtocolError::ChannelClosed`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }
}

impl Transport for MemoryTransport {
    async fn publish(&self, publication: Publication) -> Result<(), ProtocolError> {
        if self.offline.load(Ordering::Acquire) {
            return Err(ProtocolError::ChannelClosed(
                "memory transport is offline".to_string(),
            ));
        }
        self.published.lock().push(publication);
        Ok(())
    }
}
