// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program start time.
//!
//! Panels feed start times as text. Two notations are accepted:
//!
//! - 24-hour `HH:MM` (optionally `HH:MM:SS`), as produced by a time input
//! - 12-hour `h:mm AM` / `h:mm PM`, as produced by a time picker widget

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Start time of a heating program, in whole minutes.
///
/// # Examples
///
/// ```
/// use heater_control::types::StartTime;
///
/// let t = StartTime::new(7, 30).unwrap();
/// assert_eq!(t.to_string(), "07:30");
///
/// let t: StartTime = "18:00".parse().unwrap();
/// assert_eq!((t.hour(), t.minute()), (18, 0));
///
/// let t: StartTime = "6:45 PM".parse().unwrap();
/// assert_eq!((t.hour(), t.minute()), (18, 45));
///
/// assert!(StartTime::new(24, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartTime {
    hour: u8,
    minute: u8,
}

impl StartTime {
    /// Highest valid hour.
    pub const MAX_HOUR: u8 = 23;

    /// Highest valid minute.
    pub const MAX_MINUTE: u8 = 59;

    /// Creates a start time.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the hour is above 23 or the
    /// minute is above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValueError> {
        if hour > Self::MAX_HOUR {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(Self::MAX_HOUR),
                actual: i64::from(hour),
            });
        }
        if minute > Self::MAX_MINUTE {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(Self::MAX_MINUTE),
                actual: i64::from(minute),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Creates a start time from untrusted wide integers.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` when either component is out of range.
    pub fn from_components(hour: i64, minute: i64) -> Result<Self, ValueError> {
        let hour = u8::try_from(hour).map_err(|_| ValueError::OutOfRange {
            min: 0,
            max: i64::from(Self::MAX_HOUR),
            actual: hour,
        })?;
        let minute = u8::try_from(minute).map_err(|_| ValueError::OutOfRange {
            min: 0,
            max: i64::from(Self::MAX_MINUTE),
            actual: minute,
        })?;
        Self::new(hour, minute)
    }

    /// Returns the hour (0-23).
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for StartTime {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidTime(s.to_string());
        let text = s.trim();

        let upper = text.to_ascii_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let mut parts = clock.split(':');
        let hour_text = parts.next().ok_or_else(invalid)?;
        let minute_text = parts.next();
        let second_text = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let parse = |part: &str| -> Result<u8, ValueError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let mut hour = parse(hour_text)?;
        let minute = match minute_text {
            Some(m) => parse(m)?,
            // Bare hours only make sense in the 12-hour notation ("7 PM")
            None if meridiem.is_some() => 0,
            None => return Err(invalid()),
        };
        if let Some(seconds) = second_text {
            parse(seconds)?;
        }

        if let Some(pm) = meridiem {
            if hour == 0 || hour > 12 {
                return Err(invalid());
            }
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }

        Self::new(hour, minute)
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_time_bounds() {
        assert!(StartTime::new(23, 59).is_ok());
        assert!(StartTime::new(24, 0).is_err());
        assert!(StartTime::new(0, 60).is_err());
        assert!(StartTime::from_components(300, 0).is_err());
        assert!(StartTime::from_components(7, -1).is_err());
    }

    #[test]
    fn start_time_display_pads() {
        assert_eq!(StartTime::new(7, 5).unwrap().to_string(), "07:05");
        assert_eq!(StartTime::new(18, 0).unwrap().to_string(), "18:00");
    }

    #[test]
    fn parse_24_hour() {
        assert_eq!("07:30".parse::<StartTime>().unwrap(), StartTime::new(7, 30).unwrap());
        assert_eq!("7:30".parse::<StartTime>().unwrap(), StartTime::new(7, 30).unwrap());
        assert_eq!(
            "23:15:00".parse::<StartTime>().unwrap(),
            StartTime::new(23, 15).unwrap()
        );
    }

    #[test]
    fn parse_12_hour() {
        assert_eq!("7:30 AM".parse::<StartTime>().unwrap(), StartTime::new(7, 30).unwrap());
        assert_eq!("7:30 pm".parse::<StartTime>().unwrap(), StartTime::new(19, 30).unwrap());
        assert_eq!("12:15 AM".parse::<StartTime>().unwrap(), StartTime::new(0, 15).unwrap());
        assert_eq!("12:15 PM".parse::<StartTime>().unwrap(), StartTime::new(12, 15).unwrap());
        assert_eq!("9 PM".parse::<StartTime>().unwrap(), StartTime::new(21, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "7", "ab:cd", "25:00", "10:75", "13:00 PM", "1:2:3:4", "-1:00"] {
            assert!(input.parse::<StartTime>().is_err(), "accepted {input:?}");
        }
    }
}
