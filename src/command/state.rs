// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State query command.

use crate::command::{Command, TOPIC_STATE};

/// Asks the device to republish its full state.
///
/// The device answers with `status/settings`, `status/temp` and
/// `status/heating` messages.
///
/// # Examples
///
/// ```
/// use heater_control::command::{Command, StateCommand};
///
/// assert_eq!(StateCommand::Update.topic(), "heater/command/state");
/// assert_eq!(StateCommand::Update.payload(), b"update".to_vec());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateCommand {
    /// Request a state update.
    #[default]
    Update,
}

impl Command for StateCommand {
    fn topic(&self) -> &'static str {
        TOPIC_STATE
    }

    fn payload(&self) -> Vec<u8> {
        b"update".to_vec()
    }
}
