//! Compares the current snapshot against the previously stored one and
//! classifies the transition. Comparison is strictly on the minimum price;
//! the full price set is informational only.

use crate::shared::types::{PriceSnapshot, SnapshotStatus};

/// Classified outcome of one monitoring run, produced fresh each cycle
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// First successful observation for this target
    Initial(PriceSnapshot),
    PriceDecreased {
        previous_min: u32,
        current_min: u32,
        delta: u32,
    },
    PriceIncreased {
        previous_min: u32,
        current_min: u32,
        delta: u32,
    },
    Unchanged(u32),
    /// The target was bookable last run and no longer is - likely sold out
    BecameUnavailable,
    StillUnavailable,
    ExtractionFailed(String),
}

/// Classify the transition from `previous` to `current`
pub fn detect(current: &PriceSnapshot, previous: Option<&PriceSnapshot>) -> NotificationEvent {
    let had_success = previous.map(|p| p.is_success()).unwrap_or(false);

    match current.status {
        SnapshotStatus::Success => {
            // Success snapshots always carry a min price
            let current_min = current.min_price.unwrap_or(0);

            let previous_min = match previous {
                Some(prev) if prev.is_success() => prev.min_price,
                _ => None,
            };

            match previous_min {
                None => NotificationEvent::Initial(current.clone()),
                Some(previous_min) if current_min < previous_min => {
                    NotificationEvent::PriceDecreased {
                        previous_min,
                        current_min,
                        delta: previous_min - current_min,
                    }
                }
                Some(previous_min) if current_min > previous_min => {
                    NotificationEvent::PriceIncreased {
                        previous_min,
                        current_min,
                        delta: current_min - previous_min,
                    }
                }
                Some(_) => NotificationEvent::Unchanged(current_min),
            }
        }
        SnapshotStatus::NoAvailability => {
            if had_success {
                NotificationEvent::BecameUnavailable
            } else {
                NotificationEvent::StillUnavailable
            }
        }
        SnapshotStatus::NoPriceFound | SnapshotStatus::Error => {
            let reason = current
                .message
                .clone()
                .unwrap_or_else(|| "extraction failed".to_string());
            NotificationEvent::ExtractionFailed(reason)
        }
    }
}
