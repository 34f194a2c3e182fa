// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater controller.
//!
//! [`HeaterController`] is the single entry point of a front end. It turns
//! user edits into commands, applies incoming status messages to the
//! [`Panel`] and broadcasts every panel change as a [`PanelEvent`].
//!
//! # Examples
//!
//! ```
//! use heater_control::HeaterController;
//! use heater_control::panel::PanelLayout;
//! use heater_control::protocol::MemoryTransport;
//! use heater_control::types::ProgramId;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> heater_control::Result<()> {
//! let transport = MemoryTransport::new();
//! let controller = HeaterController::builder(transport.clone())
//!     .layout(PanelLayout::classic())
//!     .build()?;
//!
//! let program = ProgramId::new(1)?;
//! controller.program_time_changed(program, "06:45")?;
//! tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!
//! let sent = transport.published_on("heater/command/setstart");
//! assert_eq!(sent[0].payload, vec![1, 6, 45]);
//!
//! controller.handle_message("heater/status/temp", "52");
//! assert_eq!(controller.panel().gauge().current, Some(52));
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};

use crate::command::{
    ActivateCommand, Command, ImmediateCommand, SetStartCommand, SetTempCommand, StateCommand,
};
use crate::config::ClientConfig;
use crate::debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer};
use crate::error::{Error, ProtocolError, Result};
use crate::event::{EventBus, PanelEvent};
use crate::panel::{GaugeView, Locale, Panel, PanelLayout, PanelRouter};
use crate::protocol::{IncomingMessage, Transport};
use crate::types::{ActivationState, ProgramId, StartTime, Temperature};

struct Inner<T> {
    transport: T,
    panel: Mutex<Panel>,
    router: PanelRouter,
    events: EventBus,
    time_debouncers: Vec<Debouncer<StartTime>>,
    temp_debouncers: Vec<Debouncer<Temperature>>,
    immediate_debouncer: Debouncer<Temperature>,
}

/// Drives a heater control panel over a [`Transport`].
///
/// Cloning is cheap and clones share one panel.
pub struct HeaterController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for HeaterController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> HeaterController<T> {
    /// Creates a builder around a transport.
    #[must_use]
    pub fn builder(transport: T) -> HeaterControllerBuilder<T> {
        HeaterControllerBuilder::new(transport)
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Returns the panel layout.
    #[must_use]
    pub fn layout(&self) -> PanelLayout {
        *self.inner.panel.lock().layout()
    }

    /// Returns a snapshot of the panel.
    #[must_use]
    pub fn panel(&self) -> Panel {
        self.inner.panel.lock().clone()
    }

    /// Renders the gauge.
    #[must_use]
    pub fn gauge_view(&self) -> GaugeView {
        self.inner.panel.lock().gauge_view()
    }

    /// Subscribes to panel changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.inner.events.subscribe()
    }

    /// Handles an edit of a program's start time field.
    ///
    /// Accepts `HH:MM` and 12-hour `h:mm AM` text. The field is stored at
    /// once; `setstart` is sent after the debounce delay.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProgram` for ids beyond the layout and
    /// `Error::Value` when the text is not a valid time. An invalid time
    /// empties the field and drops a pending `setstart`.
    pub fn program_time_changed(&self, program: ProgramId, text: &str) -> Result<()> {
        let slot = self.inner.program_slot(program)?;
        let time = match text.parse::<StartTime>() {
            Ok(time) => time,
            Err(e) => {
                tracing::debug!(
                    program = %program,
                    input = %text,
                    error = %e,
                    "Rejected start time"
                );
                self.inner.time_debouncers[slot].cancel();
                self.inner.panel.lock().form_mut().clear_time(program);
                return Err(e.into());
            }
        };

        self.inner.panel.lock().form_mut().set_time(program, time);

        let inner = Arc::downgrade(&self.inner);
        self.inner.time_debouncers[slot].schedule(time, move |time| async move {
            if let Some(inner) = Weak::upgrade(&inner) {
                inner.send_program_change(&SetStartCommand::new(program, time), program).await;
            }
        });
        Ok(())
    }

    /// Handles an edit of a program's temperature field.
    ///
    /// The field is stored at once; `settemp` is sent after the debounce
    /// delay.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProgram` for ids beyond the layout and
    /// `Error::Value` when the text is not a temperature in 0-255. An
    /// invalid temperature empties the field and drops a pending `settemp`.
    pub fn program_temp_changed(&self, program: ProgramId, text: &str) -> Result<()> {
        let slot = self.inner.program_slot(program)?;
        let temperature = match parse_temperature(text) {
            Ok(temperature) => temperature,
            Err(e) => {
                self.inner.temp_debouncers[slot].cancel();
                self.inner.panel.lock().form_mut().clear_temperature(program);
                return Err(e);
            }
        };

        self.inner
            .panel
            .lock()
            .form_mut()
            .set_temperature(program, temperature);

        let inner = Arc::downgrade(&self.inner);
        self.inner.temp_debouncers[slot].schedule(temperature, move |temperature| async move {
            if let Some(inner) = Weak::upgrade(&inner) {
                inner
                    .send_program_change(&SetTempCommand::new(program, temperature), program)
                    .await;
            }
        });
        Ok(())
    }

    /// Handles a click on a program's activation control.
    ///
    /// `activate` is sent right away.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProgram` for ids beyond the layout and
    /// `Error::Protocol` if the transport rejects the command.
    pub async fn activation_selected(
        &self,
        program: ProgramId,
        state: ActivationState,
    ) -> Result<()> {
        self.inner.program_slot(program)?;
        self.inner.panel.lock().form_mut().set_state(program, state);

        self.inner.send(&ActivateCommand::new(program, state)).await?;
        self.inner.log_program_change(program);
        Ok(())
    }

    /// Handles an edit of the immediate heating temperature field.
    ///
    /// After the debounce delay the value is sent as `settemp` for the
    /// program id after the last scheduled program. Layouts without an
    /// immediate field ignore the edit.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` when the text is not a temperature in 0-255,
    /// after emptying the field and dropping a pending send.
    pub fn immediate_temp_changed(&self, text: &str) -> Result<()> {
        let temperature = {
            let mut panel = self.inner.panel.lock();
            if !panel.layout().has_immediate_temp() {
                tracing::debug!("Layout has no immediate temperature field");
                return Ok(());
            }
            match parse_temperature(text) {
                Ok(temperature) => {
                    panel.form_mut().set_immediate_temperature(temperature);
                    temperature
                }
                Err(e) => {
                    self.inner.immediate_debouncer.cancel();
                    panel.form_mut().clear_immediate_temperature();
                    return Err(e);
                }
            }
        };

        let inner = Arc::downgrade(&self.inner);
        self.inner
            .immediate_debouncer
            .schedule(temperature, move |temperature| async move {
                if let Some(inner) = Weak::upgrade(&inner) {
                    inner.send_immediate_temperature(temperature).await;
                }
            });
        Ok(())
    }

    /// Starts immediate heating.
    ///
    /// Returns `Ok(false)` without sending when the layout requires an
    /// immediate temperature and its field is still empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the transport rejects the command.
    pub async fn start_immediate(&self) -> Result<bool> {
        let (target, locale) = {
            let panel = self.inner.panel.lock();
            let target = panel.form().immediate_temperature();
            if panel.layout().requires_immediate_temp() && target.is_none() {
                tracing::debug!("Immediate temperature not set, start skipped");
                return Ok(false);
            }
            (target, panel.locale())
        };

        self.inner.send(&ImmediateCommand::Start).await?;
        self.inner.log(locale.immediate_started(target));
        Ok(true)
    }

    /// Stops immediate heating.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the transport rejects the command.
    pub async fn stop_immediate(&self) -> Result<()> {
        self.inner.send(&ImmediateCommand::Stop).await?;
        let locale = self.inner.panel.lock().locale();
        self.inner.log(locale.immediate_stopped());
        Ok(())
    }

    /// Asks the heater to republish its state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the transport rejects the command.
    pub async fn request_state_update(&self) -> Result<()> {
        self.inner.send(&StateCommand::Update).await?;
        Ok(())
    }

    /// Applies one incoming message to the panel.
    ///
    /// Returns `true` if the message was a status message that reached its
    /// handler. Malformed payloads are logged and leave the panel unchanged.
    pub fn handle_message(&self, topic: &str, payload: &str) -> bool {
        let routed = {
            let mut panel = self.inner.panel.lock();
            self.inner.router.route(&mut panel, topic, payload)
        };

        match routed {
            Ok(Some(events)) => {
                for event in events {
                    self.inner.events.publish(event);
                }
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Dropping malformed status message");
                false
            }
        }
    }

    /// Applies incoming messages until the channel closes.
    pub async fn run(&self, mut incoming: mpsc::Receiver<IncomingMessage>) {
        while let Some(message) = incoming.recv().await {
            self.handle_message(&message.topic, &message.payload);
        }
        tracing::info!("Incoming message channel closed, controller stopped");
    }
}

impl<T> std::fmt::Debug for HeaterController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let panel = self.inner.panel.lock();
        f.debug_struct("HeaterController")
            .field("layout", panel.layout())
            .field("locale", &panel.locale())
            .field("subscribers", &self.inner.events.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Inner<T> {
    /// Index of the program's debouncers.
    fn program_slot(&self, program: ProgramId) -> Result<usize> {
        if self.panel.lock().layout().contains_program(program) {
            Ok(usize::from(program.value()) - 1)
        } else {
            Err(Error::UnknownProgram(program.value()))
        }
    }

    async fn send<C: Command>(&self, command: &C) -> std::result::Result<(), ProtocolError> {
        let publication = command.to_publication();
        match self.transport.publish(publication.clone()).await {
            Ok(()) => {
                tracing::debug!(
                    topic = %publication.topic,
                    payload = ?publication.payload,
                    "Command sent"
                );
                self.events.publish(PanelEvent::CommandSent(publication));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(topic = %publication.topic, error = %e, "Failed to send command");
                Err(e)
            }
        }
    }

    async fn send_program_change<C: Command>(&self, command: &C, program: ProgramId) {
        if self.send(command).await.is_ok() {
            self.log_program_change(program);
        }
    }

    async fn send_immediate_temperature(&self, temperature: Temperature) {
        let (id, locale) = {
            let panel = self.panel.lock();
            (panel.layout().immediate_program_id(), panel.locale())
        };
        if self.send(&SetTempCommand::new(id, temperature)).await.is_ok() {
            self.log(locale.immediate_temp_sent(temperature, id));
        }
    }

    fn log_program_change(&self, program: ProgramId) {
        let message = {
            let panel = self.panel.lock();
            let Some(form) = panel.form().program(program) else {
                return;
            };
            panel
                .locale()
                .program_changed(program, form.state, form.time, form.temperature)
        };
        self.log(message);
    }

    fn log(&self, message: String) {
        tracing::debug!(entry = %message, "Event log");
        let entry = self.panel.lock().append_log(message);
        if let Some(entry) = entry {
            self.events.publish(PanelEvent::LogAppended(entry));
        }
    }
}

fn parse_temperature(text: &str) -> Result<Temperature> {
    let temperature = text.parse::<Temperature>().inspect_err(|e| {
        tracing::debug!(input = %text, error = %e, "Rejected temperature");
    })?;
    Ok(temperature)
}

/// Builder for [`HeaterController`].
#[derive(Debug)]
pub struct HeaterControllerBuilder<T> {
    transport: T,
    layout: PanelLayout,
    locale: Locale,
    debounce_delay: Duration,
    event_capacity: Option<usize>,
    runtime: Option<Handle>,
}

impl<T: Transport> HeaterControllerBuilder<T> {
    fn new(transport: T) -> Self {
        Self {
            transport,
            layout: PanelLayout::default(),
            locale: Locale::default(),
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            event_capacity: None,
            runtime: None,
        }
    }

    /// Takes layout, locale and debounce delay from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the panel section describes no valid
    /// layout.
    pub fn config(mut self, config: &ClientConfig) -> Result<Self> {
        self.layout = config.panel_layout()?;
        self.locale = config.panel.locale;
        self.debounce_delay = config.debounce_delay();
        Ok(self)
    }

    /// Sets the panel layout (default: [`PanelLayout::modern`]).
    #[must_use]
    pub fn layout(mut self, layout: PanelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the event log language (default: English).
    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets the debounce delay for text fields (default: 1 second).
    #[must_use]
    pub fn debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Sets how many events a slow observer may fall behind (default: 256).
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity.max(1));
        self
    }

    /// Runs debounce timers on `runtime` instead of the current runtime.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the controller.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoRuntime` when no runtime handle was given and
    /// none is running.
    pub fn build(self) -> Result<HeaterController<T>> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| Error::NoRuntime)?,
        };
        let router = Panel::router()?;

        let count = usize::from(self.layout.program_count());
        let delay = self.debounce_delay;
        let time_debouncers = (0..count)
            .map(|_| Debouncer::with_handle(delay, runtime.clone()))
            .collect();
        let temp_debouncers = (0..count)
            .map(|_| Debouncer::with_handle(delay, runtime.clone()))
            .collect();
        let immediate_debouncer = Debouncer::with_handle(delay, runtime);

        let mut panel = Panel::new(self.layout, self.locale);
        panel.append_log(self.locale.startup());

        tracing::info!(
            programs = count,
            gauge = ?self.layout.gauge(),
            locale = ?self.locale,
            debounce_ms = delay.as_millis(),
            "Heater controller started"
        );

        Ok(HeaterController {
            inner: Arc::new(Inner {
                transport: self.transport,
                panel: Mutex::new(panel),
                router,
                events: self
                    .event_capacity
                    .map_or_else(EventBus::new, EventBus::with_capacity),
                time_debouncers,
                temp_debouncers,
                immediate_debouncer,
            }),
        })
    }
}
