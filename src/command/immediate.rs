// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immediate heating commands.

use crate::command::{Command, TOPIC_START, TOPIC_STOP};

/// Command to start or stop on-demand heating.
///
/// # Examples
///
/// ```
/// use heater_control::command::{Command, ImmediateCommand};
///
/// assert_eq!(ImmediateCommand::Start.topic(), "heater/command/start");
/// assert_eq!(ImmediateCommand::Start.payload(), b"start".to_vec());
/// assert_eq!(ImmediateCommand::Stop.payload(), b"stop".to_vec());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateCommand {
    /// Start heating to the immediate slot temperature.
    Start,
    /// Stop immediate heating.
    Stop,
}

impl ImmediateCommand {
    /// Returns the ASCII payload.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl Command for ImmediateCommand {
    fn topic(&self) -> &'static str {
        match self {
            Self::Start => TOPIC_START,
            Self::Stop => TOPIC_STOP,
        }
    }

    fn payload(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}
