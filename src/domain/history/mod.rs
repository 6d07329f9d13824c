//! History domain - bounded price sample log

pub mod history_log;

pub use history_log::{HistoryLog, DEFAULT_HISTORY_CAPACITY};
