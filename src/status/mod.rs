// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incoming status messages.
//!
//! The device reports on `<root>/status/<kind>`. This module parses such
//! topics, decodes their payloads into [`StatusMessage`]s, and routes them
//! through a [`StatusRouter`] dispatch table.
//!
//! ```text
//! MQTT Message: heater/status/heating → 1
//!                     ↓
//!          StatusTopic::parse() → kind "heating"
//!                     ↓
//!    StatusMessage::decode(Heating, "1") → Heating(true)
//!                     ↓
//!        StatusRouter handler for Heating
//! ```

mod router;

use std::fmt;

use crate::error::ParseError;
use crate::settings::SettingsSnapshot;
use crate::types::{ProgramId, parse_leading_int};

pub use router::{StatusHandler, StatusRouter, StatusRouterBuilder};

/// Kind of status message, taken from the last topic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Current water temperature.
    Temp,
    /// Heating on/off.
    Heating,
    /// Target temperature of the running heat cycle.
    TargetTemp,
    /// One device log line.
    Log,
    /// Device asks to clear the log.
    LogClear,
    /// Current-flow flag.
    Current,
    /// A one-time program finished and was switched off.
    Deactivate,
    /// Complete settings snapshot.
    Settings,
}

impl StatusKind {
    /// Every kind, for handler table validation.
    pub const ALL: [Self; 8] = [
        Self::Temp,
        Self::Heating,
        Self::TargetTemp,
        Self::Log,
        Self::LogClear,
        Self::Current,
        Self::Deactivate,
        Self::Settings,
    ];

    /// Returns the topic segment for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Temp => "temp",
            Self::Heating => "heating",
            Self::TargetTemp => "targetTemp",
            Self::Log => "log",
            Self::LogClear => "logClear",
            Self::Current => "current",
            Self::Deactivate => "deactivate",
            Self::Settings => "settings",
        }
    }

    /// Looks up a kind by its topic segment. Matching is case-sensitive.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == segment)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `<root>/status/<kind>` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTopic<'a> {
    /// The topic root (e.g. `heater`).
    pub root: &'a str,
    /// The raw kind segment.
    pub kind: &'a str,
}

impl<'a> StatusTopic<'a> {
    /// Parses a status topic.
    ///
    /// Only topics with exactly three segments whose middle segment is
    /// `status` match.
    ///
    /// ```
    /// use heater_control::status::StatusTopic;
    ///
    /// let topic = StatusTopic::parse("heater/status/temp").unwrap();
    /// assert_eq!(topic.root, "heater");
    /// assert_eq!(topic.kind, "temp");
    ///
    /// assert!(StatusTopic::parse("heater/command/start").is_none());
    /// assert!(StatusTopic::parse("heater/status/temp/extra").is_none());
    /// ```
    #[must_use]
    pub fn parse(topic: &'a str) -> Option<Self> {
        let mut parts = topic.split('/');
        let root = parts.next()?;
        let middle = parts.next()?;
        let kind = parts.next()?;
        if parts.next().is_some() || middle != "status" {
            return None;
        }
        Some(Self { root, kind })
    }

    /// Returns the known kind, if any.
    #[must_use]
    pub fn status_kind(&self) -> Option<StatusKind> {
        StatusKind::from_segment(self.kind)
    }
}

/// A decoded status message.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    /// Current temperature in degrees.
    Temperature(i32),
    /// Heating active.
    Heating(bool),
    /// Target temperature; `None` when the payload was not a number.
    TargetTemperature(Option<f32>),
    /// Device log line.
    Log(String),
    /// Clear the log.
    LogClear,
    /// Current-flow flag.
    Current(bool),
    /// Program forced off.
    Deactivate(ProgramId),
    /// Settings snapshot.
    Settings(SettingsSnapshot),
}

impl StatusMessage {
    /// Decodes a payload for the given kind.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the payload of a `temp`, `deactivate` or
    /// `settings` message cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use heater_control::status::{StatusKind, StatusMessage};
    ///
    /// let msg = StatusMessage::decode(StatusKind::Temp, "42").unwrap();
    /// assert_eq!(msg, StatusMessage::Temperature(42));
    ///
    /// let msg = StatusMessage::decode(StatusKind::Heating, "0").unwrap();
    /// assert_eq!(msg, StatusMessage::Heating(false));
    ///
    /// assert!(StatusMessage::decode(StatusKind::Settings, "{oops").is_err());
    /// ```
    pub fn decode(kind: StatusKind, payload: &str) -> Result<Self, ParseError> {
        match kind {
            StatusKind::Temp => {
                let value = parse_leading_int(payload)
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| invalid("temp", payload))?;
                Ok(Self::Temperature(value))
            }
            StatusKind::Heating => Ok(Self::Heating(parse_flag(payload))),
            StatusKind::TargetTemp => Ok(Self::TargetTemperature(
                payload.trim().parse::<f32>().ok().filter(|t| t.is_finite()),
            )),
            StatusKind::Log => Ok(Self::Log(payload.to_string())),
            StatusKind::LogClear => Ok(Self::LogClear),
            StatusKind::Current => Ok(Self::Current(parse_flag(payload))),
            StatusKind::Deactivate => payload
                .parse::<ProgramId>()
                .map(Self::Deactivate)
                .map_err(|e| ParseError::InvalidValue {
                    field: "deactivate".to_string(),
                    message: e.to_string(),
                }),
            StatusKind::Settings => SettingsSnapshot::parse(payload).map(Self::Settings),
        }
    }

    /// Returns the kind of this message.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Temperature(_) => StatusKind::Temp,
            Self::Heating(_) => StatusKind::Heating,
            Self::TargetTemperature(_) => StatusKind::TargetTemp,
            Self::Log(_) => StatusKind::Log,
            Self::LogClear => StatusKind::LogClear,
            Self::Current(_) => StatusKind::Current,
            Self::Deactivate(_) => StatusKind::Deactivate,
            Self::Settings(_) => StatusKind::Settings,
        }
    }
}

/// `"1"` is true, everything else false.
fn parse_flag(payload: &str) -> bool {
    parse_leading_int(payload) == Some(1)
}

fn invalid(field: &str, payload: &str) -> ParseError {
    ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("not an integer: {payload:?}"),
    }
}
