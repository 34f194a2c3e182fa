// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel change notifications.
//!
//! Every change the controller makes to the [`Panel`](crate::panel::Panel)
//! is broadcast as a [`PanelEvent`] on an [`EventBus`], so a front end can
//! redraw only what changed.
//!
//! # Examples
//!
//! ```
//! use heater_control::event::{EventBus, PanelEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(PanelEvent::HeatingChanged(true));
//! assert!(matches!(rx.try_recv(), Ok(PanelEvent::HeatingChanged(true))));
//! ```

mod event_bus;
mod panel_event;

pub use event_bus::EventBus;
pub use panel_event::PanelEvent;
