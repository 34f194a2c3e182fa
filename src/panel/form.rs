// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program form state.

use crate::settings::SettingsSnapshot;
use crate::types::{ActivationState, ProgramId, StartTime, Temperature};

/// The editable fields of one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgramForm {
    /// Start time field; `None` until set by the user or a snapshot.
    pub time: Option<StartTime>,
    /// Temperature field; `None` until set by the user or a snapshot.
    pub temperature: Option<Temperature>,
    /// Selected activation control.
    pub state: ActivationState,
}

/// Outcome of applying a settings snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreSummary {
    /// Programs written into the form.
    pub restored: usize,
    /// Programs in the snapshot that the panel has no controls for.
    pub skipped: usize,
    /// Whether the immediate temperature field was written.
    pub immediate: bool,
}

/// Values of all program fields plus the immediate slot.
///
/// # Examples
///
/// ```
/// use heater_control::panel::FormState;
/// use heater_control::types::{ActivationState, ProgramId};
///
/// let mut form = FormState::new(3);
/// let id = ProgramId::new(2).unwrap();
///
/// assert!(form.set_state(id, ActivationState::Once));
/// assert_eq!(form.program(id).unwrap().state, ActivationState::Once);
///
/// assert!(form.deactivate(id));
/// assert_eq!(form.program(id).unwrap().state, ActivationState::Off);
///
/// // Ids beyond the panel are skipped
/// assert!(!form.set_state(ProgramId::new(9).unwrap(), ActivationState::Active));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    programs: Vec<ProgramForm>,
    immediate_temperature: Option<Temperature>,
}

impl FormState {
    /// Creates an empty form with `program_count` programs.
    #[must_use]
    pub fn new(program_count: u8) -> Self {
        Self {
            programs: vec![ProgramForm::default(); usize::from(program_count)],
            immediate_temperature: None,
        }
    }

    /// Returns the number of programs.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Returns the fields of a program.
    #[must_use]
    pub fn program(&self, id: ProgramId) -> Option<&ProgramForm> {
        self.programs.get(usize::from(id.value()) - 1)
    }

    fn program_mut(&mut self, id: ProgramId) -> Option<&mut ProgramForm> {
        self.programs.get_mut(usize::from(id.value()) - 1)
    }

    /// Iterates programs with their ids.
    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &ProgramForm)> {
        self.programs
            .iter()
            .zip(1..=u8::MAX)
            .filter_map(|(form, id)| ProgramId::new(id).ok().map(|id| (id, form)))
    }

    /// Sets the start time field. Returns `false` if the program does not exist.
    pub fn set_time(&mut self, id: ProgramId, time: StartTime) -> bool {
        let Some(program) = self.program_mut(id) else {
            return false;
        };
        program.time = Some(time);
        true
    }

    /// Sets the temperature field. Returns `false` if the program does not exist.
    pub fn set_temperature(&mut self, id: ProgramId, temperature: Temperature) -> bool {
        let Some(program) = self.program_mut(id) else {
            return false;
        };
        program.temperature = Some(temperature);
        true
    }

    /// Empties the start time field. Returns `false` if the program does not exist.
    pub fn clear_time(&mut self, id: ProgramId) -> bool {
        let Some(program) = self.program_mut(id) else {
            return false;
        };
        program.time = None;
        true
    }

    /// Empties the temperature field. Returns `false` if the program does not exist.
    pub fn clear_temperature(&mut self, id: ProgramId) -> bool {
        let Some(program) = self.program_mut(id) else {
            return false;
        };
        program.temperature = None;
        true
    }

    /// Selects an activation control. Returns `false` if the program does not exist.
    pub fn set_state(&mut self, id: ProgramId, state: ActivationState) -> bool {
        let Some(program) = self.program_mut(id) else {
            return false;
        };
        program.state = state;
        true
    }

    /// Forces a program's activation to off.
    pub fn deactivate(&mut self, id: ProgramId) -> bool {
        self.set_state(id, ActivationState::Off)
    }

    /// Returns the immediate slot temperature field.
    #[must_use]
    pub fn immediate_temperature(&self) -> Option<Temperature> {
        self.immediate_temperature
    }

    /// Sets the immediate slot temperature field.
    pub fn set_immediate_temperature(&mut self, temperature: Temperature) {
        self.immediate_temperature = Some(temperature);
    }

    /// Empties the immediate slot temperature field.
    pub fn clear_immediate_temperature(&mut self) {
        self.immediate_temperature = None;
    }

    /// Writes a validated snapshot into the form.
    ///
    /// Programs the form has no slot for are skipped. The immediate
    /// temperature is only written when `with_immediate` is set and the
    /// snapshot carries one.
    pub fn restore(&mut self, snapshot: &SettingsSnapshot, with_immediate: bool) -> RestoreSummary {
        let mut summary = RestoreSummary::default();

        for program in &snapshot.programs {
            let Some(form) = self.program_mut(program.id) else {
                summary.skipped += 1;
                continue;
            };
            form.time = Some(program.time);
            form.temperature = Some(program.temperature);
            form.state = program.state;
            summary.restored += 1;
        }

        if with_immediate && let Some(temperature) = snapshot.immediate_temperature {
            self.immediate_temperature = Some(temperature);
            summary.immediate = true;
        }

        summary
    }
}
