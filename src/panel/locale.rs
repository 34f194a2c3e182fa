// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event log wording.

use crate::types::{ActivationState, ProgramId, StartTime, Temperature};

/// Language used for event log entries and gauge labels.
///
/// # Examples
///
/// ```
/// use heater_control::panel::Locale;
/// use heater_control::types::ActivationState;
///
/// assert_eq!(Locale::English.state_label(ActivationState::Once), "once");
/// assert_eq!(Locale::Hebrew.state_label(ActivationState::Active), "פעיל");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Locale {
    /// English messages.
    #[default]
    #[serde(rename = "en")]
    English,
    /// Hebrew messages.
    #[serde(rename = "he")]
    Hebrew,
}

impl Locale {
    /// Returns the label shown for an activation state.
    #[must_use]
    pub const fn state_label(self, state: ActivationState) -> &'static str {
        match (self, state) {
            (Self::English, ActivationState::Off) => "off",
            (Self::English, ActivationState::Active) => "active",
            (Self::English, ActivationState::Once) => "once",
            (Self::Hebrew, ActivationState::Off) => "כבוי",
            (Self::Hebrew, ActivationState::Active) => "פעיל",
            (Self::Hebrew, ActivationState::Once) => "חד-פעמי",
        }
    }

    /// Returns the label prefixing the target temperature on the gauge.
    #[must_use]
    pub const fn target_label(self) -> &'static str {
        match self {
            Self::English => "target",
            Self::Hebrew => "יעד",
        }
    }

    /// Entry written when the panel starts.
    #[must_use]
    pub fn startup(self) -> String {
        match self {
            Self::English => "System loaded successfully.",
            Self::Hebrew => "המערכת נטענה בהצלחה.",
        }
        .to_string()
    }

    /// Entry written after a settings snapshot was applied.
    #[must_use]
    pub fn settings_restored(self) -> String {
        match self {
            Self::English => "Settings restored successfully.",
            Self::Hebrew => "הגדרות שוחזרו בהצלחה.",
        }
        .to_string()
    }

    /// Entry written when a program field was sent to the device.
    #[must_use]
    pub fn program_changed(
        self,
        id: ProgramId,
        state: ActivationState,
        time: Option<StartTime>,
        temperature: Option<Temperature>,
    ) -> String {
        let label = self.state_label(state);
        let time = time.map_or_else(|| "--:--".to_string(), |t| t.to_string());
        let temperature = temperature.map_or_else(|| "--".to_string(), |t| t.to_string());
        match self {
            Self::English => format!(
                "Program {id} switched to {label} with start time {time} and target temperature {temperature} degrees."
            ),
            Self::Hebrew => format!(
                "תכנית {id} עברה למצב {label} עם זמן התחלה של {time} וטמפרטורת יעד של {temperature} מעלות."
            ),
        }
    }

    /// Entry written when immediate heating starts.
    #[must_use]
    pub fn immediate_started(self, temperature: Option<Temperature>) -> String {
        match (self, temperature) {
            (Self::English, Some(t)) => {
                format!("Starting immediate heating. Target temperature: {t}°C")
            }
            (Self::English, None) => "Starting immediate heating.".to_string(),
            (Self::Hebrew, Some(t)) => format!("מפעיל חימום מיידי. טמפרטורת יעד: {t}°C"),
            (Self::Hebrew, None) => "מפעיל חימום מיידי.".to_string(),
        }
    }

    /// Entry written when immediate heating stops.
    #[must_use]
    pub fn immediate_stopped(self) -> String {
        match self {
            Self::English => "Stopping immediate heating.",
            Self::Hebrew => "מפסיק חימום מיידי.",
        }
        .to_string()
    }

    /// Entry written when the immediate slot temperature was sent.
    #[must_use]
    pub fn immediate_temp_sent(self, temperature: Temperature, id: ProgramId) -> String {
        match self {
            Self::English => {
                format!("Sending immediate temperature: {temperature}°C (program {id})")
            }
            Self::Hebrew => format!("שליחת טמפרטורת מיידית: {temperature}°C (תוכנית {id})"),
        }
    }
}
