//! Infrastructure layer - external collaborators (HTTP, markup, storage,
//! webhook delivery)

pub mod fetch;
pub mod markup;
pub mod store;
pub mod notify;

pub use fetch::{DemoPageFetcher, HttpPageFetcher, PageFetcher};
pub use markup::MarkupScanner;
pub use store::{HistoryStore, JsonHistoryStore, JsonSnapshotStore, SnapshotStore};
pub use notify::{ConsoleNotifier, DiscordWebhook, NotifyBackend};
