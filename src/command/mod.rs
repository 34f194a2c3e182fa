// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater command definitions.
//!
//! This module provides typed representations of the commands the panel
//! sends to the boiler controller. Every command maps to one fixed MQTT
//! topic and a compact payload.
//!
//! # Available Commands
//!
//! | Command Type | Topic | Payload |
//! |-------------|-------|---------|
//! | [`SetStartCommand`] | `heater/command/setstart` | bytes `[id, hour, minute]` |
//! | [`SetTempCommand`] | `heater/command/settemp` | bytes `[id, temp]` |
//! | [`ActivateCommand`] | `heater/command/activate` | bytes `[id, state]` |
//! | [`ImmediateCommand`] | `heater/command/start` / `stop` | ASCII `start` / `stop` |
//! | [`StateCommand`] | `heater/command/state` | ASCII `update` |
//!
//! # Examples
//!
//! ```
//! use heater_control::command::{Command, SetStartCommand};
//! use heater_control::types::{ProgramId, StartTime};
//!
//! let cmd = SetStartCommand::new(ProgramId::new(1).unwrap(), StartTime::new(7, 30).unwrap());
//!
//! assert_eq!(cmd.topic(), "heater/command/setstart");
//! assert_eq!(cmd.payload(), vec![1, 7, 30]);
//! ```

mod immediate;
mod program;
mod state;

pub use immediate::ImmediateCommand;
pub use program::{ActivateCommand, SetStartCommand, SetTempCommand};
pub use state::StateCommand;

/// Topic for program start time changes.
pub const TOPIC_SET_START: &str = "heater/command/setstart";
/// Topic for program temperature changes.
pub const TOPIC_SET_TEMP: &str = "heater/command/settemp";
/// Topic for program activation changes.
pub const TOPIC_ACTIVATE: &str = "heater/command/activate";
/// Topic for starting immediate heating.
pub const TOPIC_START: &str = "heater/command/start";
/// Topic for stopping immediate heating.
pub const TOPIC_STOP: &str = "heater/command/stop";
/// Topic for requesting a full state update.
pub const TOPIC_STATE: &str = "heater/command/state";

/// A command that can be sent to the heater controller.
pub trait Command {
    /// Returns the full MQTT topic this command is published on.
    fn topic(&self) -> &'static str;

    /// Returns the raw payload bytes.
    fn payload(&self) -> Vec<u8>;

    /// Bundles topic and payload into a [`Publication`].
    fn to_publication(&self) -> Publication {
        Publication {
            topic: self.topic().to_string(),
            payload: self.payload(),
        }
    }
}

/// An outgoing message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Destination topic.
    pub topic: String,
    /// Raw payload.
    pub payload: Vec<u8>,
}

impl Publication {
    /// Creates a publication.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Returns the payload as text when it is valid UTF-8.
    #[must_use]
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
