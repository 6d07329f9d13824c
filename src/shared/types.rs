//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single observation of the monitored page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Success,
    NoAvailability,
    NoPriceFound,
    Error,
}

/// One point-in-time classified observation of the target's prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub status: SnapshotStatus,
    /// Unique, ascending, non-empty iff status == Success
    pub prices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PriceSnapshot {
    /// Build a Success snapshot from a deduplicated ascending price list.
    /// Panics in debug builds if the list is empty; callers classify first.
    pub fn success(prices: Vec<u32>, timestamp: DateTime<Utc>) -> Self {
        debug_assert!(!prices.is_empty());
        let min_price = prices.first().copied();
        let max_price = prices.last().copied();
        Self {
            status: SnapshotStatus::Success,
            prices,
            min_price,
            max_price,
            timestamp: Some(timestamp),
            message: None,
        }
    }

    pub fn no_availability(message: impl Into<String>) -> Self {
        Self {
            status: SnapshotStatus::NoAvailability,
            prices: Vec::new(),
            min_price: None,
            max_price: None,
            timestamp: Some(Utc::now()),
            message: Some(message.into()),
        }
    }

    pub fn no_price_found(message: impl Into<String>) -> Self {
        Self {
            status: SnapshotStatus::NoPriceFound,
            prices: Vec::new(),
            min_price: None,
            max_price: None,
            timestamp: Some(Utc::now()),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SnapshotStatus::Error,
            prices: Vec::new(),
            min_price: None,
            max_price: None,
            timestamp: Some(Utc::now()),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SnapshotStatus::Success
    }
}

/// One recorded price sample; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub price: u32,
    pub timestamp: DateTime<Utc>,
}

/// Inclusive numeric range used to reject non-price numeric noise
/// (dates, IDs, phone numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibilityWindow {
    pub min: u32,
    pub max: u32,
}

impl PlausibilityWindow {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PlausibilityWindow {
    fn default() -> Self {
        // Heuristic bounds tuned against the monitored booking page
        Self { min: 1000, max: 50000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_snapshot_derives_min_max() {
        let snapshot = PriceSnapshot::success(vec![6300, 7000, 8000], Utc::now());
        assert_eq!(snapshot.status, SnapshotStatus::Success);
        assert_eq!(snapshot.min_price, Some(6300));
        assert_eq!(snapshot.max_price, Some(8000));
        assert!(snapshot.message.is_none());
    }

    #[test]
    fn test_plausibility_window_bounds_are_inclusive() {
        let window = PlausibilityWindow::default();
        assert!(window.contains(1000));
        assert!(window.contains(50000));
        assert!(!window.contains(999));
        assert!(!window.contains(50001));
    }

    #[test]
    fn test_snapshot_record_serialization() {
        let snapshot = PriceSnapshot::success(vec![6300, 7000], Utc::now());
        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: PriceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
        assert!(json.contains("\"success\""));
    }

    #[test]
    fn test_failure_snapshots_have_no_prices() {
        let snapshot = PriceSnapshot::no_availability("sold out");
        assert!(snapshot.prices.is_empty());
        assert_eq!(snapshot.min_price, None);

        let snapshot = PriceSnapshot::error("connection refused");
        assert_eq!(snapshot.status, SnapshotStatus::Error);
        assert_eq!(snapshot.message.as_deref(), Some("connection refused"));
    }
}
