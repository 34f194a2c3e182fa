// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immediate-heat gauge.
//!
//! [`GaugeState`] holds what the device last reported. [`GaugeState::render`]
//! turns it into drawing instructions for the configured [`GaugeStyle`].

use crate::panel::{GaugeStyle, Locale, PanelLayout};

/// Fill color while the boiler is heating.
pub const HEATING_COLOR: &str = "#FF0000";
/// Fill color while the boiler is idle.
pub const IDLE_COLOR: &str = "#0000FF";

/// Latest gauge readings received from the device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaugeState {
    /// Current water temperature.
    pub current: Option<i32>,
    /// Target temperature of the running heat cycle.
    pub target: Option<f32>,
    /// Whether the boiler is heating.
    pub heating: bool,
}

/// How far the gauge is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeFill {
    /// Dial rotation as a fraction of a full turn.
    Rotation {
        /// Turns (`temp / 200`).
        turns: f32,
    },
    /// Bar fill percentage (0-100).
    Percent(f32),
}

/// Drawing instructions for the gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    /// Fill amount.
    pub fill: GaugeFill,
    /// Fill color.
    pub fill_color: &'static str,
    /// Whether the heating animation is on.
    pub heating_active: bool,
    /// Horizontal marker position in percent; `None` hides the marker.
    pub marker_percent: Option<f32>,
    /// Text in the middle of the gauge.
    pub text: String,
}

impl GaugeState {
    /// Renders the gauge for a layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use heater_control::panel::{GaugeFill, GaugeState, Locale, PanelLayout};
    ///
    /// let state = GaugeState { current: Some(40), target: Some(55.0), heating: true };
    /// let view = state.render(&PanelLayout::modern(), Locale::English);
    ///
    /// assert_eq!(view.fill, GaugeFill::Percent(50.0));
    /// assert_eq!(view.marker_percent, Some(75.0));
    /// assert_eq!(view.text, "40°C (target: 55°C)");
    /// ```
    #[must_use]
    pub fn render(&self, layout: &PanelLayout, locale: Locale) -> GaugeView {
        let fill_color = if self.heating {
            HEATING_COLOR
        } else {
            IDLE_COLOR
        };

        match layout.gauge() {
            GaugeStyle::Dial => {
                #[allow(clippy::cast_precision_loss)]
                let turns = self.current.map_or(0.0, |t| t as f32 / 200.0);
                let text = self
                    .current
                    .map_or_else(|| "--º".to_string(), |t| format!("{t}º"));
                GaugeView {
                    fill: GaugeFill::Rotation { turns },
                    fill_color,
                    heating_active: self.heating,
                    marker_percent: None,
                    text,
                }
            }
            GaugeStyle::Bar { min, max } => {
                #[allow(clippy::cast_precision_loss)]
                let fill = self
                    .current
                    .map_or(0.0, |t| scale_percent(t as f32, min, max));
                let marker_percent = self
                    .target
                    .filter(|_| layout.has_target_marker() && self.heating)
                    .map(|t| scale_percent(t, min, max));
                GaugeView {
                    fill: GaugeFill::Percent(fill),
                    fill_color,
                    heating_active: self.heating,
                    marker_percent,
                    text: self.bar_text(locale),
                }
            }
        }
    }

    fn bar_text(&self, locale: Locale) -> String {
        let mut text = match (self.current, self.target) {
            (Some(current), _) => format!("{current}°C"),
            (None, Some(target)) => format!("{}°C", round(target)),
            (None, None) => "--°C".to_string(),
        };
        if self.heating
            && let Some(target) = self.target
        {
            text.push_str(&format!(
                " ({}: {}°C)",
                locale.target_label(),
                round(target)
            ));
        }
        text
    }
}

/// Position of `value` on a `min..max` scale, clamped to 0-100.
#[allow(clippy::cast_precision_loss)]
fn scale_percent(value: f32, min: i32, max: i32) -> f32 {
    let (min, max) = (min as f32, max as f32);
    let range = max - min;
    if range <= 0.0 {
        return 0.0;
    }
    ((value.clamp(min, max) - min) / range) * 100.0
}

#[allow(clippy::cast_possible_truncation)]
fn round(value: f32) -> i32 {
    value.round() as i32
}
