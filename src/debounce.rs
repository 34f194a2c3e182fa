// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trailing-edge debouncing for text fields.
//!
//! Typing into a time or temperature field produces a burst of edits. A
//! [`Debouncer`] keeps only the latest value and hands it on once the field
//! has been quiet for the configured delay.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::Error;

/// Quiet period before a debounced value is sent.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

struct Slot<V> {
    generation: u64,
    pending: Option<V>,
    timer: Option<AbortHandle>,
}

/// Single-shot timer that fires with the most recently scheduled value.
///
/// Each [`schedule`](Self::schedule) call replaces the pending value and
/// restarts the timer. A timer that already woke up but lost the race
/// against a newer `schedule` call fires nothing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use heater_control::debounce::Debouncer;
/// use tokio::sync::mpsc;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// let debouncer = Debouncer::new(Duration::from_millis(1000)).unwrap();
/// let (tx, mut rx) = mpsc::unbounded_channel();
///
/// for value in 1..=5 {
///     let tx = tx.clone();
///     debouncer.schedule(value, move |v| async move {
///         let _ = tx.send(v);
///     });
/// }
///
/// assert_eq!(rx.recv().await, Some(5));
/// # }
/// ```
pub struct Debouncer<V> {
    slot: Arc<Mutex<Slot<V>>>,
    delay: Duration,
    runtime: Handle,
}

impl<V: Send + 'static> Debouncer<V> {
    /// Creates a debouncer on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoRuntime` when called outside a Tokio runtime.
    pub fn new(delay: Duration) -> Result<Self, Error> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_handle(delay, runtime))
    }

    /// Creates a debouncer whose timers run on `runtime`.
    #[must_use]
    pub fn with_handle(delay: Duration, runtime: Handle) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                pending: None,
                timer: None,
            })),
            delay,
            runtime,
        }
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Stores `value` and restarts the timer.
    ///
    /// When the timer elapses without another call, `fire` runs with the
    /// stored value. A previously scheduled `fire` is dropped unrun.
    pub fn schedule<F, Fut>(&self, value: V, fire: F)
    where
        F: FnOnce(V) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        slot.pending = Some(value);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let delay = self.delay;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let value = {
                let mut slot = shared.lock();
                if slot.generation != generation {
                    return;
                }
                // Sending must not be aborted by a later schedule call
                slot.timer = None;
                slot.pending.take()
            };

            if let Some(value) = value {
                fire(value).await;
            }
        });
        slot.timer = Some(task.abort_handle());
    }

    /// Drops the pending value without firing. Returns the dropped value.
    pub fn cancel(&self) -> Option<V> {
        let mut slot = self.slot.lock();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.pending.take()
    }

    /// Returns `true` while a value waits for its timer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }

    /// Returns a copy of the pending value.
    #[must_use]
    pub fn pending(&self) -> Option<V>
    where
        V: Clone,
    {
        self.slot.lock().pending.clone()
    }
}

impl<V> Drop for Debouncer<V> {
    fn drop(&mut self) {
        if let Some(timer) = self.slot.lock().timer.take() {
            timer.abort();
        }
    }
}

impl<V> std::fmt::Debug for Debouncer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &slot.generation)
            .field("pending", &slot.pending.is_some())
            .finish_non_exhaustive()
    }
}
