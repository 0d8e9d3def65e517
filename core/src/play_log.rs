//! Play log
//!
//! Bounded, newest-first history of executed plays. Test plays never
//! appear here.

use std::collections::VecDeque;

use ads_types::LogEntry;
use chrono::{DateTime, Utc};

/// Maximum number of entries retained
pub const PLAY_LOG_CAPACITY: usize = 50;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default)]
pub struct PlayLog {
    entries: VecDeque<LogEntry>,
}

impl PlayLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, dropping the oldest entry past capacity
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(PLAY_LOG_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Format an instant as wall time at a fixed UTC+8 offset.
///
/// The offset does not follow the local timezone or any DST rules.
pub fn format_utc8(at: DateTime<Utc>) -> String {
    (at + chrono::Duration::hours(8))
        .naive_utc()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
