// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel layouts.
//!
//! A layout describes which controls a panel variant has. Updates that
//! target a control the layout lacks are skipped.

use crate::error::ValueError;
use crate::types::ProgramId;

/// Lower bound of the bar gauge scale on the modern panel.
pub const BAR_MIN_TEMP: i32 = 10;
/// Upper bound of the bar gauge scale on the modern panel.
pub const BAR_MAX_TEMP: i32 = 70;

/// How the current temperature gauge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", tag = "style")]
pub enum GaugeStyle {
    /// Half-circle dial; the fill rotates by `temp / 200` of a turn.
    Dial,
    /// Horizontal bar over a fixed temperature range.
    Bar {
        /// Temperature shown at the left edge.
        min: i32,
        /// Temperature shown at the right edge.
        max: i32,
    },
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self::Bar {
            min: BAR_MIN_TEMP,
            max: BAR_MAX_TEMP,
        }
    }
}

/// Description of a panel variant.
///
/// # Examples
///
/// ```
/// use heater_control::panel::PanelLayout;
///
/// let classic = PanelLayout::classic();
/// assert_eq!(classic.program_count(), 3);
/// assert_eq!(classic.immediate_program_id().value(), 4);
///
/// let modern = PanelLayout::modern().with_program_count(5).unwrap();
/// assert!(modern.has_target_marker());
/// assert_eq!(modern.immediate_program_id().value(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    program_count: u8,
    gauge: GaugeStyle,
    has_event_log: bool,
    has_immediate_temp: bool,
    requires_immediate_temp: bool,
    has_target_marker: bool,
}

impl PanelLayout {
    /// Largest number of scheduled programs a panel can hold.
    ///
    /// The immediate slot takes the next id, which must still fit a byte.
    pub const MAX_PROGRAMS: u8 = u8::MAX - 1;

    /// Three programs, dial gauge, event log and an immediate slot.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            program_count: 3,
            gauge: GaugeStyle::Dial,
            has_event_log: true,
            has_immediate_temp: true,
            requires_immediate_temp: false,
            has_target_marker: false,
        }
    }

    /// Bar gauge with a target marker, event log and an immediate slot.
    ///
    /// Immediate heating only starts once the immediate temperature is set.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            program_count: 3,
            gauge: GaugeStyle::Bar {
                min: BAR_MIN_TEMP,
                max: BAR_MAX_TEMP,
            },
            has_event_log: true,
            has_immediate_temp: true,
            requires_immediate_temp: true,
            has_target_marker: true,
        }
    }

    /// Sets the number of scheduled programs.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for zero or more than
    /// [`MAX_PROGRAMS`](Self::MAX_PROGRAMS) programs.
    pub fn with_program_count(mut self, count: u8) -> Result<Self, ValueError> {
        if count == 0 || count > Self::MAX_PROGRAMS {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: i64::from(Self::MAX_PROGRAMS),
                actual: i64::from(count),
            });
        }
        self.program_count = count;
        Ok(self)
    }

    /// Sets the gauge style.
    #[must_use]
    pub const fn with_gauge(mut self, gauge: GaugeStyle) -> Self {
        self.gauge = gauge;
        self
    }

    /// Enables or disables the event log.
    #[must_use]
    pub const fn with_event_log(mut self, enabled: bool) -> Self {
        self.has_event_log = enabled;
        self
    }

    /// Enables or disables the immediate temperature field.
    #[must_use]
    pub const fn with_immediate_temp(mut self, enabled: bool) -> Self {
        self.has_immediate_temp = enabled;
        self
    }

    /// Sets whether starting immediate heating needs a filled immediate
    /// temperature field.
    #[must_use]
    pub const fn with_required_immediate_temp(mut self, required: bool) -> Self {
        self.requires_immediate_temp = required;
        self
    }

    /// Enables or disables the target marker on the gauge.
    #[must_use]
    pub const fn with_target_marker(mut self, enabled: bool) -> Self {
        self.has_target_marker = enabled;
        self
    }

    /// Returns the number of scheduled programs.
    #[must_use]
    pub const fn program_count(&self) -> u8 {
        self.program_count
    }

    /// Returns the gauge style.
    #[must_use]
    pub const fn gauge(&self) -> GaugeStyle {
        self.gauge
    }

    /// Returns whether the panel shows an event log.
    #[must_use]
    pub const fn has_event_log(&self) -> bool {
        self.has_event_log
    }

    /// Returns whether the panel has an immediate temperature field.
    #[must_use]
    pub const fn has_immediate_temp(&self) -> bool {
        self.has_immediate_temp
    }

    /// Returns whether an empty immediate temperature field blocks starting
    /// immediate heating. Always `false` without that field.
    #[must_use]
    pub const fn requires_immediate_temp(&self) -> bool {
        self.has_immediate_temp && self.requires_immediate_temp
    }

    /// Returns whether the gauge has a target marker.
    #[must_use]
    pub const fn has_target_marker(&self) -> bool {
        self.has_target_marker
    }

    /// Returns whether `id` is one of the scheduled programs.
    #[must_use]
    pub const fn contains_program(&self, id: ProgramId) -> bool {
        id.value() <= self.program_count
    }

    /// Returns the id of the immediate slot (`program_count + 1`).
    #[must_use]
    pub fn immediate_program_id(&self) -> ProgramId {
        // program_count is capped at MAX_PROGRAMS, so this neither overflows nor hits zero
        ProgramId::new(self.program_count.saturating_add(1)).unwrap_or(ProgramId::MAX_ID)
    }
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self::modern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_preset() {
        let layout = PanelLayout::classic();
        assert_eq!(layout.gauge(), GaugeStyle::Dial);
        assert!(layout.has_event_log());
        assert!(layout.has_immediate_temp());
        assert!(!layout.requires_immediate_temp());
        assert!(!layout.has_target_marker());
    }

    #[test]
    fn modern_requires_immediate_temp() {
        let layout = PanelLayout::modern();
        assert!(layout.requires_immediate_temp());
        assert!(!layout.with_immediate_temp(false).requires_immediate_temp());
        assert!(!layout.with_required_immediate_temp(false).requires_immediate_temp());
    }

    #[test]
    fn program_count_bounds() {
        assert!(PanelLayout::modern().with_program_count(0).is_err());
        assert!(PanelLayout::modern().with_program_count(255).is_err());
        let layout = PanelLayout::modern().with_program_count(254).unwrap();
        assert_eq!(layout.immediate_program_id().value(), 255);
    }

    #[test]
    fn contains_program() {
        let layout = PanelLayout::classic();
        assert!(layout.contains_program(ProgramId::new(3).unwrap()));
        assert!(!layout.contains_program(ProgramId::new(4).unwrap()));
    }

    #[test]
    fn toggles() {
        let layout = PanelLayout::modern()
            .with_event_log(false)
            .with_immediate_temp(false)
            .with_target_marker(false)
            .with_gauge(GaugeStyle::Dial);
        assert!(!layout.has_event_log());
        assert!(!layout.has_immediate_temp());
        assert!(!layout.has_target_marker());
        assert_eq!(layout.gauge(), GaugeStyle::Dial);
    }
}
