// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heater Control - A Rust library to drive a home boiler controller via MQTT.
//!
//! The boiler listens on `heater/command/*` and reports on
//! `heater/status/*`. This library holds the state of a control panel
//! (program schedule, immediate heating, temperature gauge, event log),
//! turns edits of that panel into the compact binary commands the boiler
//! understands, and applies the boiler's status reports back to it.
//!
//! # Supported Features
//!
//! - **Program schedule**: start time, target temperature and activation
//!   (off / active / once) per program
//! - **Immediate heating**: start, stop and target temperature
//! - **Gauge**: current and target temperature, dial or bar rendering
//! - **Event log**: the ten most recent entries, in English or Hebrew
//! - **Settings restore**: the form is refilled from the boiler's
//!   settings snapshot
//!
//! Text fields are debounced: a burst of edits sends one command with the
//! last value once the field has been quiet for a second.
//!
//! # Quick Start
//!
//! ```no_run
//! use heater_control::protocol::MqttTransport;
//! use heater_control::types::{ActivationState, ProgramId};
//! use heater_control::HeaterController;
//!
//! #[tokio::main]
//! async fn main() -> heater_control::Result<()> {
//!     let (transport, incoming) = MqttTransport::builder()
//!         .host("192.168.1.50")
//!         .build()
//!         .await?;
//!
//!     let controller = HeaterController::builder(transport).build()?;
//!     tokio::spawn({
//!         let controller = controller.clone();
//!         async move { controller.run(incoming).await }
//!     });
//!
//!     let program = ProgramId::new(1)?;
//!     controller.program_time_changed(program, "06:30")?;
//!     controller.program_temp_changed(program, "45")?;
//!     controller.activation_selected(program, ActivationState::Active).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Observing the Panel
//!
//! ```no_run
//! use heater_control::event::PanelEvent;
//! # use heater_control::HeaterController;
//! # use heater_control::protocol::MemoryTransport;
//!
//! # async fn example(controller: HeaterController<MemoryTransport>) {
//! let mut events = controller.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if event.affects_gauge() {
//!         let view = controller.gauge_view();
//!         println!("{} ({})", view.text, view.fill_color);
//!     }
//!     if let PanelEvent::LogAppended(entry) = event {
//!         println!("{entry}");
//!     }
//! }
//! # }
//! ```

pub mod command;
pub mod config;
mod controller;
pub mod debounce;
pub mod error;
pub mod event;
pub mod panel;
pub mod protocol;
pub mod settings;
pub mod status;
pub mod types;

pub use command::{
    ActivateCommand, Command, ImmediateCommand, Publication, SetStartCommand, SetTempCommand,
    StateCommand,
};
pub use config::ClientConfig;
pub use controller::{HeaterController, HeaterControllerBuilder};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{EventBus, PanelEvent};
pub use panel::{Locale, Panel, PanelLayout};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttTransport, MqttTransportBuilder};
pub use protocol::{IncomingMessage, MemoryTransport, Transport};
pub use settings::SettingsSnapshot;
pub use types::{ActivationState, ProgramId, StartTime, Temperature};
