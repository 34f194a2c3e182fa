// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program activation state.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ValueError;

/// Activation mode of a heating program.
///
/// On the wire the state is a single byte: 1 = off, 2 = active, 3 = once.
///
/// # Examples
///
/// ```
/// use heater_control::types::ActivationState;
///
/// assert_eq!(ActivationState::Active.code(), 2);
/// assert_eq!(ActivationState::from_code(3).unwrap(), ActivationState::Once);
/// assert_eq!(ActivationState::normalize_str("ON"), ActivationState::Active);
/// assert_eq!(ActivationState::normalize_str("bogus"), ActivationState::Off);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivationState {
    /// The program never runs.
    #[default]
    Off,
    /// The program runs every day.
    Active,
    /// The program runs once, then the device deactivates it.
    Once,
}

impl ActivationState {
    /// All states in wire order.
    pub const ALL: [Self; 3] = [Self::Off, Self::Active, Self::Once];

    /// Returns the wire code (1-3).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Off => 1,
            Self::Active => 2,
            Self::Once => 3,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Active => "active",
            Self::Once => "once",
        }
    }

    /// Converts a wire code back to a state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidActivationCode` for codes other than 1-3.
    pub fn from_code(code: u8) -> Result<Self, ValueError> {
        match code {
            1 => Ok(Self::Off),
            2 => Ok(Self::Active),
            3 => Ok(Self::Once),
            other => Err(ValueError::InvalidActivationCode(other)),
        }
    }

    /// Normalizes a state token coming from the device.
    ///
    /// Matching is case-insensitive but exact, so surrounding whitespace
    /// makes a token off. `"2"`, `"active"`, `"on"` and `"true"` mean
    /// active; `"3"` and `"once"` mean once; anything else is off.
    #[must_use]
    pub fn normalize_str(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "2" | "active" | "on" | "true" => Self::Active,
            "3" | "once" => Self::Once,
            _ => Self::Off,
        }
    }

    /// Normalizes a JSON state value from a settings snapshot.
    ///
    /// Numbers map 2 to active and 3 to once, booleans map `true` to active,
    /// strings go through [`normalize_str`](Self::normalize_str). Any other
    /// value is off.
    ///
    /// ```
    /// use heater_control::types::ActivationState;
    /// use serde_json::json;
    ///
    /// assert_eq!(ActivationState::normalize(&json!(2)), ActivationState::Active);
    /// assert_eq!(ActivationState::normalize(&json!("once")), ActivationState::Once);
    /// assert_eq!(ActivationState::normalize(&json!(true)), ActivationState::Active);
    /// assert_eq!(ActivationState::normalize(&json!(null)), ActivationState::Off);
    /// ```
    #[must_use]
    pub fn normalize(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) if (v - 2.0).abs() < f64::EPSILON => Self::Active,
                Some(v) if (v - 3.0).abs() < f64::EPSILON => Self::Once,
                _ => Self::Off,
            },
            Value::String(s) => Self::normalize_str(s),
            Value::Bool(true) => Self::Active,
            _ => Self::Off,
        }
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivationState {
    type Err = ValueError;

    /// Strict parse of a control name. `"on"` is accepted as an alias of
    /// `active`, matching the button naming of the classic panel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "active" | "on" => Ok(Self::Active),
            "once" => Ok(Self::Once),
            _ => Err(ValueError::InvalidActivationState(s.to_string())),
        }
    }
}

impl From<ActivationState> for u8 {
    fn from(state: ActivationState) -> Self {
        state.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_round_trip() {
        for state in ActivationState::ALL {
            assert_eq!(ActivationState::from_code(state.code()).unwrap(), state);
        }
        assert!(ActivationState::from_code(0).is_err());
        assert!(ActivationState::from_code(4).is_err());
    }

    #[test]
    fn normalize_active_inputs() {
        let inputs = [
            json!(2),
            json!("2"),
            json!("active"),
            json!("on"),
            json!("ON"),
            json!(true),
        ];
        for value in inputs {
            assert_eq!(
                ActivationState::normalize(&value),
                ActivationState::Active,
                "{value}"
            );
        }
    }

    #[test]
    fn normalize_once_inputs() {
        for value in [json!(3), json!("3"), json!("once"), json!("Once")] {
            assert_eq!(ActivationState::normalize(&value), ActivationState::Once, "{value}");
        }
    }

    #[test]
    fn normalize_everything_else_is_off() {
        for value in [
            json!(1),
            json!(0),
            json!(7),
            json!(2.5),
            json!("off"),
            json!("maybe"),
            json!(" on "),
            json!("2 "),
            json!(false),
            json!(null),
            json!([2]),
            json!({"state": 2}),
        ] {
            assert_eq!(ActivationState::normalize(&value), ActivationState::Off, "{value}");
        }
    }

    #[test]
    fn normalize_float_two_is_active() {
        assert_eq!(ActivationState::normalize(&json!(2.0)), ActivationState::Active);
    }

    #[test]
    fn from_str_strict() {
        assert_eq!("on".parse::<ActivationState>().unwrap(), ActivationState::Active);
        assert_eq!("OFF".parse::<ActivationState>().unwrap(), ActivationState::Off);
        assert!(matches!(
            "2".parse::<ActivationState>(),
            Err(ValueError::InvalidActivationState(_))
        ));
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&ActivationState::Once).unwrap(), "\"once\"");
    }
}
