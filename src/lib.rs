//! Farewatch - highway bus fare monitor v2
//! Built with Domain-Driven Design principles

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::monitor::FareMonitor;
pub use domain::detection::{detect, NotificationEvent};
pub use domain::extraction::{ExtractorConfig, PriceExtractor};
pub use domain::history::HistoryLog;
pub use domain::notification::{NotificationComposer, NotifyPolicy};
pub use domain::trend::LineGraph;
