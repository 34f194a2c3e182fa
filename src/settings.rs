// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings snapshot parsing.
//!
//! The device publishes its complete program table on `<root>/status/settings`
//! as a JSON document:
//!
//! ```json
//! {
//!   "progCount": 2,
//!   "programs": [
//!     {"hour": 7, "min": 30, "temp": 45, "state": 2},
//!     {"hour": 18, "min": 0, "temp": 50, "state": "once"},
//!     {"temp": 40}
//!   ]
//! }
//! ```
//!
//! The first `progCount` entries are the scheduled programs. The trailing
//! entry holds the immediate slot temperature.
//!
//! Parsing validates the whole document before anything is applied, so a
//! malformed snapshot never leaves a panel half-restored.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ParseError, ValueError};
use crate::types::{ActivationState, ProgramId, StartTime, Temperature};

/// Settings of one scheduled program inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramSettings {
    /// Program id (1-based position in the snapshot).
    pub id: ProgramId,
    /// Start time.
    pub time: StartTime,
    /// Target temperature.
    pub temperature: Temperature,
    /// Normalized activation state.
    pub state: ActivationState,
}

/// A validated settings snapshot.
///
/// # Examples
///
/// ```
/// use heater_control::settings::SettingsSnapshot;
/// use heater_control::types::ActivationState;
///
/// let json = r#"{"progCount":1,"programs":[{"hour":6,"min":15,"temp":48,"state":"on"},{"temp":42}]}"#;
/// let snapshot: SettingsSnapshot = json.parse().unwrap();
///
/// assert_eq!(snapshot.programs.len(), 1);
/// assert_eq!(snapshot.programs[0].time.to_string(), "06:15");
/// assert_eq!(snapshot.programs[0].state, ActivationState::Active);
/// assert_eq!(snapshot.immediate_temperature.map(|t| t.value()), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    /// Scheduled programs in id order.
    pub programs: Vec<ProgramSettings>,
    /// Immediate slot temperature, when the trailing entry carries one.
    pub immediate_temperature: Option<Temperature>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(rename = "progCount")]
    prog_count: i64,
    #[serde(default)]
    programs: Vec<RawProgram>,
}

#[derive(Debug, Deserialize)]
struct RawProgram {
    hour: Option<i64>,
    min: Option<i64>,
    temp: Option<i64>,
    #[serde(default)]
    state: Value,
}

impl SettingsSnapshot {
    /// Parses and validates a settings document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` for malformed JSON, `ParseError::MissingField`
    /// when a program entry or one of its fields is absent, and
    /// `ParseError::InvalidValue` when a value does not fit its range.
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        let raw: RawSettings = serde_json::from_str(json)?;

        // The immediate slot takes id progCount + 1, which must still fit a byte
        let count = usize::try_from(raw.prog_count)
            .ok()
            .filter(|count| *count < usize::from(u8::MAX))
            .ok_or_else(|| invalid("progCount", &out_of_range(raw.prog_count, 254)))?;

        if raw.programs.len() < count {
            return Err(ParseError::MissingField(format!(
                "programs[{}]",
                raw.programs.len()
            )));
        }

        let programs = raw
            .programs
            .iter()
            .take(count)
            .enumerate()
            .map(|(index, program)| parse_program(index, program))
            .collect::<Result<Vec<_>, _>>()?;

        let immediate_temperature = match raw.programs.get(count).and_then(|p| p.temp) {
            Some(degrees) => Some(
                Temperature::new(degrees)
                    .map_err(|e| invalid(&format!("programs[{count}].temp"), &e))?,
            ),
            None => None,
        };

        Ok(Self {
            programs,
            immediate_temperature,
        })
    }

    /// Returns the number of scheduled programs.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }
}

impl FromStr for SettingsSnapshot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_program(index: usize, raw: &RawProgram) -> Result<ProgramSettings, ParseError> {
    let field = |name: &str| format!("programs[{index}].{name}");
    let require = |value: Option<i64>, name: &str| {
        value.ok_or_else(|| ParseError::MissingField(field(name)))
    };

    let hour = require(raw.hour, "hour")?;
    let minute = require(raw.min, "min")?;
    let degrees = require(raw.temp, "temp")?;

    let id = u8::try_from(index + 1)
        .map_err(|_| ParseError::MissingField(field("id")))
        .and_then(|id| ProgramId::new(id).map_err(|e| invalid(&field("id"), &e)))?;
    let time =
        StartTime::from_components(hour, minute).map_err(|e| invalid(&field("hour/min"), &e))?;
    let temperature = Temperature::new(degrees).map_err(|e| invalid(&field("temp"), &e))?;

    Ok(ProgramSettings {
        id,
        time,
        temperature,
        state: ActivationState::normalize(&raw.state),
    })
}

fn out_of_range(actual: i64, max: i64) -> ValueError {
    ValueError::OutOfRange {
        min: 0,
        max,
        actual,
    }
}

fn invalid(field: &str, err: &ValueError) -> ParseError {
    ParseError::InvalidValue {
        field: field.to_string(),
        message: err.to_string(),
    }
}
