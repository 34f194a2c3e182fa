// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status dispatch table.

use std::collections::HashMap;
use std::fmt;

use super::{StatusKind, StatusMessage, StatusTopic};
use crate::error::{Error, ParseError};

/// Handler invoked for one status kind.
pub type StatusHandler<C, O> = fn(&mut C, &StatusMessage) -> O;

/// Routes decoded status messages to per-kind handlers.
///
/// A router always holds a handler for every [`StatusKind`]; the builder
/// refuses to produce one otherwise.
///
/// # Examples
///
/// ```
/// use heater_control::status::{StatusKind, StatusMessage, StatusRouter};
///
/// fn count(hits: &mut u32, _: &StatusMessage) {
///     *hits += 1;
/// }
///
/// let mut builder = StatusRouter::builder();
/// for kind in StatusKind::ALL {
///     builder = builder.on(kind, count);
/// }
/// let router = builder.build().unwrap();
///
/// let mut hits = 0;
/// assert!(router.route(&mut hits, "heater/status/temp", "40").unwrap().is_some());
/// assert!(router.route(&mut hits, "heater/command/start", "start").unwrap().is_none());
/// assert_eq!(hits, 1);
/// ```
pub struct StatusRouter<C, O = ()> {
    handlers: Vec<StatusHandler<C, O>>,
}

impl<C, O> StatusRouter<C, O> {
    /// Creates an empty builder.
    #[must_use]
    pub fn builder() -> StatusRouterBuilder<C, O> {
        StatusRouterBuilder::new()
    }

    /// Parses `topic`, decodes `payload` and runs the matching handler.
    ///
    /// Returns `Ok(None)` for topics that are not `<root>/status/<kind>` or
    /// whose kind is unknown.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the payload cannot be decoded. The handler
    /// is not called in that case.
    pub fn route(&self, ctx: &mut C, topic: &str, payload: &str) -> Result<Option<O>, ParseError> {
        let Some(parsed) = StatusTopic::parse(topic) else {
            tracing::trace!(topic = %topic, "Ignoring non-status topic");
            return Ok(None);
        };

        let Some(kind) = parsed.status_kind() else {
            tracing::trace!(topic = %topic, kind = %parsed.kind, "Ignoring unknown status kind");
            return Ok(None);
        };

        let message = StatusMessage::decode(kind, payload)?;
        tracing::debug!(topic = %topic, kind = %kind, "Dispatching status message");
        Ok(Some(self.dispatch(ctx, &message)))
    }

    /// Runs the handler registered for the message's kind.
    pub fn dispatch(&self, ctx: &mut C, message: &StatusMessage) -> O {
        let handler = self.handlers[slot(message.kind())];
        handler(ctx, message)
    }
}

impl<C, O> fmt::Debug for StatusRouter<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusRouter")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Builder for [`StatusRouter`].
pub struct StatusRouterBuilder<C, O = ()> {
    handlers: HashMap<StatusKind, StatusHandler<C, O>>,
}

impl<C, O> StatusRouterBuilder<C, O> {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers the handler for `kind`, replacing any previous one.
    #[must_use]
    pub fn on(mut self, kind: StatusKind, handler: StatusHandler<C, O>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Builds the router.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnhandledStatusKind` naming the first kind without a
    /// handler.
    pub fn build(self) -> Result<StatusRouter<C, O>, Error> {
        let handlers = StatusKind::ALL
            .into_iter()
            .map(|kind| {
                self.handlers
                    .get(&kind)
                    .copied()
                    .ok_or(Error::UnhandledStatusKind(kind))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatusRouter { handlers })
    }
}

impl<C, O> fmt::Debug for StatusRouterBuilder<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusRouterBuilder")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Position of `kind` in [`StatusKind::ALL`].
const fn slot(kind: StatusKind) -> usize {
    kind as usize
}
