// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel event types.

use crate::command::Publication;
use crate::panel::{LogEntry, RestoreSummary};
use crate::types::ProgramId;

/// A change applied to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The device reported a new current temperature.
    CurrentTemperatureChanged(i32),

    /// Heating switched on or off.
    HeatingChanged(bool),

    /// The target temperature changed; `None` clears it.
    TargetTemperatureChanged(Option<f32>),

    /// The current-flow flag changed.
    CurrentChanged(bool),

    /// An entry was added to the event log.
    LogAppended(LogEntry),

    /// The event log was cleared.
    LogCleared,

    /// The device switched a program off.
    ProgramDeactivated(ProgramId),

    /// A settings snapshot was written into the form.
    SettingsRestored(RestoreSummary),

    /// A command was handed to the transport.
    CommandSent(Publication),
}

impl PanelEvent {
    /// Returns `true` if the event changes what the gauge shows.
    #[must_use]
    pub const fn affects_gauge(&self) -> bool {
        matches!(
            self,
            Self::CurrentTemperatureChanged(_)
                | Self::HeatingChanged(_)
                | Self::TargetTemperatureChanged(_)
        )
    }
}
