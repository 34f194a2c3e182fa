// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-program commands.
//!
//! These commands carry a binary payload whose first byte is the program id.

use crate::command::{Command, TOPIC_ACTIVATE, TOPIC_SET_START, TOPIC_SET_TEMP};
use crate::error::ValueError;
use crate::types::{ActivationState, ProgramId, StartTime, Temperature};

/// Command to change the start time of a program.
///
/// # Examples
///
/// ```
/// use heater_control::command::{Command, SetStartCommand};
///
/// let cmd = SetStartCommand::from_raw(2, 18, 0).unwrap();
/// assert_eq!(cmd.payload(), vec![2, 18, 0]);
///
/// // Hours past 23 never reach the wire
/// assert!(SetStartCommand::from_raw(2, 24, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetStartCommand {
    /// The program to update.
    pub program: ProgramId,
    /// The new start time.
    pub time: StartTime,
}

impl SetStartCommand {
    /// Creates a start time command.
    #[must_use]
    pub const fn new(program: ProgramId, time: StartTime) -> Self {
        Self { program, time }
    }

    /// Creates a start time command from raw values, validating each one.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the id is zero or the time is out of range.
    pub fn from_raw(id: u8, hour: u8, minute: u8) -> Result<Self, ValueError> {
        Ok(Self::new(ProgramId::new(id)?, StartTime::new(hour, minute)?))
    }
}

impl Command for SetStartCommand {
    fn topic(&self) -> &'static str {
        TOPIC_SET_START
    }

    fn payload(&self) -> Vec<u8> {
        vec![self.program.value(), self.time.hour(), self.time.minute()]
    }
}

/// Command to change the target temperature of a program.
///
/// The immediate slot is updated with the same command, using the id right
/// after the last scheduled program.
///
/// # Examples
///
/// ```
/// use heater_control::command::{Command, SetTempCommand};
///
/// let cmd = SetTempCommand::from_raw(1, 45).unwrap();
/// assert_eq!(cmd.topic(), "heater/command/settemp");
/// assert_eq!(cmd.payload(), vec![1, 45]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTempCommand {
    /// The program to update.
    pub program: ProgramId,
    /// The new target temperature.
    pub temperature: Temperature,
}

impl SetTempCommand {
    /// Creates a temperature command.
    #[must_use]
    pub const fn new(program: ProgramId, temperature: Temperature) -> Self {
        Self {
            program,
            temperature,
        }
    }

    /// Creates a temperature command from raw values.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the id is zero or the temperature does not fit
    /// in a byte.
    pub fn from_raw(id: u8, degrees: i64) -> Result<Self, ValueError> {
        Ok(Self::new(ProgramId::new(id)?, Temperature::new(degrees)?))
    }
}

impl Command for SetTempCommand {
    fn topic(&self) -> &'static str {
        TOPIC_SET_TEMP
    }

    fn payload(&self) -> Vec<u8> {
        vec![self.program.value(), self.temperature.value()]
    }
}

/// Command to change the activation state of a program.
///
/// # Examples
///
/// ```
/// use heater_control::command::{ActivateCommand, Command};
/// use heater_control::types::{ActivationState, ProgramId};
///
/// let cmd = ActivateCommand::new(ProgramId::new(3).unwrap(), ActivationState::Active);
/// assert_eq!(cmd.payload(), vec![3, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateCommand {
    /// The program to update.
    pub program: ProgramId,
    /// The new activation state.
    pub state: ActivationState,
}

impl ActivateCommand {
    /// Creates an activation command.
    #[must_use]
    pub const fn new(program: ProgramId, state: ActivationState) -> Self {
        Self { program, state }
    }
}

impl Command for ActivateCommand {
    fn topic(&self) -> &'static str {
        TOPIC_ACTIVATE
    }

    fn payload(&self) -> Vec<u8> {
        vec![self.program.value(), self.state.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_start_payload_layout() {
        for (id, hour, minute) in [(1, 0, 0), (3, 23, 59), (255, 12, 30)] {
            let cmd = SetStartCommand::from_raw(id, hour, minute).unwrap();
            assert_eq!(cmd.topic(), "heater/command/setstart");
            assert_eq!(cmd.payload(), vec![id, hour, minute]);
        }
    }

    #[test]
    fn set_start_rejects_invalid() {
        assert!(SetStartCommand::from_raw(0, 7, 30).is_err());
        assert!(SetStartCommand::from_raw(1, 7, 60).is_err());
    }

    #[test]
    fn set_temp_rejects_values_wider_than_a_byte() {
        assert!(matches!(
            SetTempCommand::from_raw(1, 256),
            Err(ValueError::OutOfRange { actual: 256, .. })
        ));
        assert!(SetTempCommand::from_raw(1, -1).is_err());
    }

    #[test]
    fn activate_codes() {
        let id = ProgramId::new(2).unwrap();
        assert_eq!(ActivateCommand::new(id, ActivationState::Off).payload(), vec![2, 1]);
        assert_eq!(ActivateCommand::new(id, ActivationState::Active).payload(), vec![2, 2]);
        assert_eq!(ActivateCommand::new(id, ActivationState::Once).payload(), vec![2, 3]);
        assert_eq!(ActivateCommand::new(id, ActivationState::Once).topic(), TOPIC_ACTIVATE);
    }
}
