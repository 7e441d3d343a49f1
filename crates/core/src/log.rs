//! Bounded, newest-first log of human-readable decision explanations.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries retained.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Ring buffer of [`LogEntry`] values. The newest entry is always at the
/// front; once `capacity` is reached the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct TransparencyLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl TransparencyLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
        }
    }

    pub fn record(&mut self, text: impl Into<String>) {
        self.record_at(Utc::now(), text);
    }

    pub fn record_at(&mut self, timestamp: DateTime<Utc>, text: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(LogEntry {
            timestamp,
            text: text.into(),
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
