// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for heater control.
//!
//! Each type checks its range at construction time, so every value that
//! reaches the command encoder already fits the single-byte wire fields.
//!
//! # Types
//!
//! - [`ProgramId`] - Program slot number (1-255)
//! - [`StartTime`] - Program start time (00:00-23:59)
//! - [`Temperature`] - Target temperature in whole degrees (0-255)
//! - [`ActivationState`] - Off / Active / Once

mod activation;
mod program;
mod start_time;
mod temperature;

pub use activation::ActivationState;
pub use program::ProgramId;
pub use start_time::StartTime;
pub use temperature::Temperature;

/// Parses the leading integer of a device payload.
///
/// Accepts optional surrounding whitespace and sign, then reads digits up to
/// the first non-digit, so `"23.7"` yields 23. Returns `None` when no digit
/// is present.
#[must_use]
pub(crate) fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_plain() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int(" 7\n"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
    }

    #[test]
    fn leading_int_stops_at_non_digit() {
        assert_eq!(parse_leading_int("23.7"), Some(23));
        assert_eq!(parse_leading_int("1abc"), Some(1));
    }

    #[test]
    fn leading_int_rejects_non_numeric() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
    }
}
