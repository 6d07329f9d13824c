//! Append-only, capacity-bounded sequence of price samples.
//!
//! Insertion order is chronological order; timestamps are trusted to be
//! monotonic and never re-sorted. Repeated identical prices are kept so that
//! flat periods render flat instead of collapsing.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::shared::types::HistoryEntry;

/// Heuristic cap tuned alongside the plausibility window
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from persisted entries, trimming oldest-first if the
    /// stored record exceeds the configured capacity
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    /// Append one sample, evicting the oldest entry past capacity
    pub fn append(&mut self, price: u32, timestamp: DateTime<Utc>) -> &VecDeque<HistoryEntry> {
        self.push(HistoryEntry { price, timestamp });
        &self.entries
    }

    fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Most recent `n` entries (or fewer) in chronological order
    pub fn window(&self, n: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Mean of the most recent `n` prices; None when the log is empty
    pub fn rolling_average(&self, n: usize) -> Option<f64> {
        let window = self.window(n);
        if window.is_empty() {
            return None;
        }
        let sum: u64 = window.iter().map(|e| e.price as u64).sum();
        Some(sum as f64 / window.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + offset_secs, 0).unwrap()
    }

    #[test]
    fn test_capacity_is_strict_fifo() {
        let mut log = HistoryLog::default();
        for i in 0..150u32 {
            log.append(5000 + i, ts(i as i64));
        }

        assert_eq!(log.len(), 100);

        // window(200) returns exactly the last 100, oldest first
        let window = log.window(200);
        assert_eq!(window.len(), 100);
        assert_eq!(window.first().unwrap().price, 5050);
        assert_eq!(window.last().unwrap().price, 5149);
        for pair in window.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn test_window_smaller_than_len() {
        let mut log = HistoryLog::default();
        for i in 0..10u32 {
            log.append(6000 + i, ts(i as i64));
        }
        let window = log.window(3);
        assert_eq!(
            window.iter().map(|e| e.price).collect::<Vec<_>>(),
            vec![6007, 6008, 6009]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut log = HistoryLog::default();
        log.append(7000, ts(0));
        log.append(7000, ts(60));
        log.append(7000, ts(120));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_rolling_average() {
        let mut log = HistoryLog::default();
        assert_eq!(log.rolling_average(24), None);

        log.append(6000, ts(0));
        log.append(7000, ts(60));
        assert_eq!(log.rolling_average(24), Some(6500.0));

        // Only the most recent n samples count
        log.append(8000, ts(120));
        assert_eq!(log.rolling_average(2), Some(7500.0));
    }

    #[test]
    fn test_from_entries_trims_overlong_records() {
        let entries: Vec<HistoryEntry> = (0..120u32)
            .map(|i| HistoryEntry { price: 5000 + i, timestamp: ts(i as i64) })
            .collect();
        let log = HistoryLog::from_entries(entries, 100);
        assert_eq!(log.len(), 100);
        assert_eq!(log.window(1)[0].price, 5119);
    }
}
