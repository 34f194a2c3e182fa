// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature type.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A whole-degree Celsius target temperature.
///
/// The device receives temperatures as one raw byte, so values are limited
/// to 0-255. Values outside that range are rejected rather than truncated.
///
/// # Examples
///
/// ```
/// use heater_control::types::Temperature;
///
/// let t = Temperature::new(45).unwrap();
/// assert_eq!(t.value(), 45);
/// assert_eq!(t.to_string(), "45");
///
/// assert!(Temperature::new(300).is_err());
///
/// // Form input is parsed strictly
/// assert_eq!("50".parse::<Temperature>().unwrap().value(), 50);
/// assert!("warm".parse::<Temperature>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Temperature(u8);

impl Temperature {
    /// Creates a temperature from a degree value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `degrees` does not fit in a byte.
    pub fn new(degrees: i64) -> Result<Self, ValueError> {
        u8::try_from(degrees)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: i64::from(u8::MAX),
                actual: degrees,
            })
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Temperature {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Temperature> for u8 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

impl TryFrom<i64> for Temperature {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Temperature {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let degrees: i64 = trimmed
            .parse()
            .map_err(|_| ValueError::InvalidNumber(trimmed.to_string()))?;
        Self::new(degrees)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bounds() {
        assert_eq!(Temperature::new(0).unwrap().value(), 0);
        assert_eq!(Temperature::new(255).unwrap().value(), 255);
        assert!(Temperature::new(256).is_err());
        assert!(Temperature::new(-5).is_err());
    }

    #[test]
    fn temperature_from_str_strict() {
        assert_eq!(" 45 ".parse::<Temperature>().unwrap().value(), 45);
        assert!(matches!(
            "".parse::<Temperature>(),
            Err(ValueError::InvalidNumber(_))
        ));
        assert!("45.5".parse::<Temperature>().is_err());
        assert!(matches!(
            "999".parse::<Temperature>(),
            Err(ValueError::OutOfRange { actual: 999, .. })
        ));
    }

    #[test]
    fn temperature_deserialize_rejects_out_of_range() {
        let t: Temperature = serde_json::from_str("40").unwrap();
        assert_eq!(t.value(), 40);
        assert!(serde_json::from_str::<Temperature>("400").is_err());
    }
}
