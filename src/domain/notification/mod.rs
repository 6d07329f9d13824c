//! Notification domain - event to message composition

pub mod composer;

pub use composer::{
    EmbedField, EmbedFooter, Notification, NotificationComposer, NotifyPolicy, Severity,
    TrendSummary,
};
