//! Application layer - the monitoring pipeline

pub mod monitor;

pub use monitor::{FareMonitor, MonitorStats};
