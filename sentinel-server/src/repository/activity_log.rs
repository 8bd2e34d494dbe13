//! Activity log
//!
//! Bounded buffer of pipeline-output lines shown on the dashboard. The newest
//! entry comes first; the oldest falls off once capacity is reached.

use sentinel_core::domain::log::LogEntry;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Adds an entry at the front, evicting the oldest when full
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = ActivityLog::new(10);
        log.push(LogEntry::info("first"));
        log.push(LogEntry::info("second"));

        let messages: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert_eq!(log.latest().unwrap().message, "second");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = ActivityLog::new(10);
        for i in 0..12 {
            log.push(LogEntry::info(format!("Message {}", i)));
        }

        assert_eq!(log.len(), 10);
        let entries = log.entries();
        assert_eq!(entries[0].message, "Message 11");
        assert_eq!(entries[9].message, "Message 2");
    }

    #[test]
    fn test_clear() {
        let mut log = ActivityLog::default();
        log.push(LogEntry::info("x"));
        log.clear();
        assert!(log.is_empty());
    }
}
