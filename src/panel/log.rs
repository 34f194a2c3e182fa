// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded event log.

use std::collections::VecDeque;
use std::fmt;

use chrono::{Local, NaiveTime, Timelike};

/// Number of entries the panel keeps.
pub const DEFAULT_LOG_CAPACITY: usize = 10;

/// One line of the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time the entry was added.
    pub timestamp: NaiveTime,
    /// The message text.
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Ring of the most recent log entries, newest first.
///
/// # Examples
///
/// ```
/// use heater_control::panel::EventLog;
///
/// let mut log = EventLog::new();
/// for i in 0..15 {
///     log.push(format!("entry {i}"));
/// }
///
/// assert_eq!(log.len(), 10);
/// assert_eq!(log.latest().unwrap().message, "entry 14");
/// ```
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Creates an empty log that keeps at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds an entry stamped with the current local time.
    ///
    /// Returns the stored entry.
    pub fn push(&mut self, message: impl Into<String>) -> &LogEntry {
        let now = Local::now().time();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        self.push_at(timestamp, message)
    }

    /// Adds an entry with an explicit timestamp.
    pub fn push_at(&mut self, timestamp: NaiveTime, message: impl Into<String>) -> &LogEntry {
        self.entries.push_front(LogEntry {
            timestamp,
            message: message.into(),
        });
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the newest entry.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Iterates entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u32) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap()
    }

    #[test]
    fn keeps_ten_newest_first() {
        let mut log = EventLog::new();
        for i in 0..15 {
            log.push_at(at(i), format!("entry {i}"));
        }

        let messages: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
        let expected: Vec<String> = (5..15).rev().map(|i| format!("entry {i}")).collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn clear_empties() {
        let mut log = EventLog::new();
        log.push("one");
        log.clear();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn entry_display() {
        let entry = LogEntry {
            timestamp: NaiveTime::from_hms_opt(8, 4, 9).unwrap(),
            message: "Heating".to_string(),
        };
        assert_eq!(entry.to_string(), "08:04:09 - Heating");
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut log = EventLog::with_capacity(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.len(), 1);
        assert_eq!(log.capacity(), 1);
    }
}
