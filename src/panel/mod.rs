// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control panel view model.
//!
//! A [`Panel`] holds everything a heater front end displays: the program
//! form, the current temperature gauge and the event log. Status messages
//! from the device are applied through the dispatch table returned by
//! [`Panel::router`].
//!
//! # Examples
//!
//! ```
//! use heater_control::panel::{Locale, Panel, PanelLayout};
//!
//! let mut panel = Panel::new(PanelLayout::classic(), Locale::English);
//! let router = Panel::router().unwrap();
//!
//! router.route(&mut panel, "heater/status/temp", "46").unwrap();
//! router.route(&mut panel, "heater/status/log", "Burner ignited").unwrap();
//!
//! assert_eq!(panel.gauge().current, Some(46));
//! assert_eq!(panel.log().unwrap().latest().unwrap().message, "Burner ignited");
//! ```

mod form;
mod gauge;
mod layout;
mod locale;
mod log;

use crate::error::Error;
use crate::event::PanelEvent;
use crate::status::{StatusKind, StatusMessage, StatusRouter};

pub use form::{FormState, ProgramForm, RestoreSummary};
pub use gauge::{GaugeFill, GaugeState, GaugeView, HEATING_COLOR, IDLE_COLOR};
pub use layout::{BAR_MAX_TEMP, BAR_MIN_TEMP, GaugeStyle, PanelLayout};
pub use locale::Locale;
pub use log::{DEFAULT_LOG_CAPACITY, EventLog, LogEntry};

/// Dispatch table that applies status messages to a [`Panel`].
pub type PanelRouter = StatusRouter<Panel, Vec<PanelEvent>>;

/// State of one control panel.
#[derive(Debug, Clone)]
pub struct Panel {
    layout: PanelLayout,
    locale: Locale,
    form: FormState,
    gauge: GaugeState,
    log: Option<EventLog>,
    current: bool,
}

impl Panel {
    /// Creates a blank panel for a layout.
    #[must_use]
    pub fn new(layout: PanelLayout, locale: Locale) -> Self {
        Self {
            form: FormState::new(layout.program_count()),
            log: layout.has_event_log().then(EventLog::new),
            gauge: GaugeState::default(),
            current: false,
            layout,
            locale,
        }
    }

    /// Builds the status dispatch table for panels.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnhandledStatusKind` if a status kind has no handler.
    pub fn router() -> Result<PanelRouter, Error> {
        StatusRouter::builder()
            .on(StatusKind::Temp, apply_temperature)
            .on(StatusKind::Heating, apply_heating)
            .on(StatusKind::TargetTemp, apply_target_temperature)
            .on(StatusKind::Log, apply_log)
            .on(StatusKind::LogClear, apply_log_clear)
            .on(StatusKind::Current, apply_current)
            .on(StatusKind::Deactivate, apply_deactivate)
            .on(StatusKind::Settings, apply_settings)
            .build()
    }

    /// Returns the layout.
    #[must_use]
    pub const fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Returns the locale.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the program form.
    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    pub(crate) const fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Returns the gauge readings.
    #[must_use]
    pub const fn gauge(&self) -> &GaugeState {
        &self.gauge
    }

    /// Renders the gauge for this panel's layout.
    #[must_use]
    pub fn gauge_view(&self) -> GaugeView {
        self.gauge.render(&self.layout, self.locale)
    }

    /// Returns the event log, or `None` if the layout has none.
    #[must_use]
    pub const fn log(&self) -> Option<&EventLog> {
        self.log.as_ref()
    }

    /// Returns the last current-flow flag reported by the device.
    #[must_use]
    pub const fn current(&self) -> bool {
        self.current
    }

    /// Adds a log entry. Returns `None` if the layout has no log.
    pub fn append_log(&mut self, message: impl Into<String>) -> Option<LogEntry> {
        self.log.as_mut().map(|log| log.push(message).clone())
    }

    /// Clears the log. Returns `false` if the layout has no log.
    pub fn clear_log(&mut self) -> bool {
        let Some(log) = self.log.as_mut() else {
            return false;
        };
        log.clear();
        true
    }

    fn log_event(&mut self, message: impl Into<String>) -> Option<PanelEvent> {
        self.append_log(message).map(PanelEvent::LogAppended)
    }
}

fn apply_temperature(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Temperature(degrees) = *message else {
        return Vec::new();
    };
    panel.gauge.current = Some(degrees);
    vec![PanelEvent::CurrentTemperatureChanged(degrees)]
}

fn apply_heating(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Heating(heating) = *message else {
        return Vec::new();
    };
    panel.gauge.heating = heating;
    vec![PanelEvent::HeatingChanged(heating)]
}

fn apply_target_temperature(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::TargetTemperature(target) = *message else {
        return Vec::new();
    };
    panel.gauge.target = target;
    vec![PanelEvent::TargetTemperatureChanged(target)]
}

fn apply_log(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Log(text) = message else {
        return Vec::new();
    };
    panel.log_event(text.as_str()).into_iter().collect()
}

fn apply_log_clear(panel: &mut Panel, _message: &StatusMessage) -> Vec<PanelEvent> {
    if panel.clear_log() {
        vec![PanelEvent::LogCleared]
    } else {
        Vec::new()
    }
}

fn apply_current(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Current(current) = *message else {
        return Vec::new();
    };
    panel.current = current;
    vec![PanelEvent::CurrentChanged(current)]
}

fn apply_deactivate(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Deactivate(id) = *message else {
        return Vec::new();
    };
    if panel.form.deactivate(id) {
        vec![PanelEvent::ProgramDeactivated(id)]
    } else {
        tracing::debug!(program = %id, "Deactivated program is not on this panel");
        Vec::new()
    }
}

fn apply_settings(panel: &mut Panel, message: &StatusMessage) -> Vec<PanelEvent> {
    let StatusMessage::Settings(snapshot) = message else {
        return Vec::new();
    };
    let summary = panel
        .form
        .restore(snapshot, panel.layout.has_immediate_temp());
    tracing::debug!(
        restored = summary.restored,
        skipped = summary.skipped,
        immediate = summary.immediate,
        "Settings restored"
    );

    let mut events = vec![PanelEvent::SettingsRestored(summary)];
    events.extend(panel.log_event(panel.locale.settings_restored()));
    events
}
