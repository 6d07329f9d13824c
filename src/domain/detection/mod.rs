//! Detection domain - snapshot comparison state machine

pub mod change_detector;

pub use change_detector::{detect, NotificationEvent};
