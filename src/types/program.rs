// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Identifier of a heating program slot on the device.
///
/// Programs are numbered from 1. The immediate slot uses the id right after
/// the last scheduled program (`N + 1`). The id travels as a single byte on
/// the wire, so the valid range is 1-255.
///
/// # Examples
///
/// ```
/// use heater_control::types::ProgramId;
///
/// let id = ProgramId::new(2).unwrap();
/// assert_eq!(id.value(), 2);
///
/// // Zero is not a program
/// assert!(ProgramId::new(0).is_err());
///
/// // Parsed from decimal text, e.g. a `deactivate` payload
/// let id: ProgramId = "3".parse().unwrap();
/// assert_eq!(id.value(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(u8);

impl ProgramId {
    /// Smallest valid program id.
    pub const MIN: u8 = 1;

    /// Highest program id.
    pub const MAX_ID: Self = Self(u8::MAX);

    /// Creates a new program id.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `id` is zero.
    pub fn new(id: u8) -> Result<Self, ValueError> {
        if id < Self::MIN {
            return Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN),
                max: i64::from(u8::MAX),
                actual: i64::from(id),
            });
        }
        Ok(Self(id))
    }

    /// Returns the numeric id.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ProgramId {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let byte = u8::try_from(value).map_err(|_| ValueError::OutOfRange {
            min: i64::from(Self::MIN),
            max: i64::from(u8::MAX),
            actual: value,
        })?;
        Self::new(byte)
    }
}

impl FromStr for ProgramId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ValueError::InvalidNumber(trimmed.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_valid_range() {
        assert_eq!(ProgramId::new(1).unwrap().value(), 1);
        assert_eq!(ProgramId::new(255).unwrap().value(), 255);
    }

    #[test]
    fn program_id_zero_rejected() {
        assert!(matches!(
            ProgramId::new(0),
            Err(ValueError::OutOfRange { actual: 0, .. })
        ));
    }

    #[test]
    fn program_id_from_wide_value_is_not_truncated() {
        assert!(ProgramId::try_from(257).is_err());
        assert!(ProgramId::try_from(-1).is_err());
        assert_eq!(ProgramId::try_from(4).unwrap().value(), 4);
    }

    #[test]
    fn program_id_from_str() {
        assert_eq!(" 2 ".parse::<ProgramId>().unwrap().value(), 2);
        assert!(matches!(
            "two".parse::<ProgramId>(),
            Err(ValueError::InvalidNumber(_))
        ));
        assert!("300".parse::<ProgramId>().is_err());
    }
}
