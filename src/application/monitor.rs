//! One monitoring cycle, fully sequential:
//! fetch -> extract -> load previous -> detect -> append history ->
//! render trend -> compose -> deliver -> persist.
//!
//! The stores are read-modify-write with no locking; callers must serialize
//! cycles (one per scheduler tick).

use std::time::Instant;

use tracing::{error, info, warn};

use crate::domain::detection::{detect, NotificationEvent};
use crate::domain::extraction::PriceExtractor;
use crate::domain::history::HistoryLog;
use crate::domain::notification::{NotificationComposer, TrendSummary};
use crate::domain::trend::{sparkline, LineGraph};
use crate::infrastructure::fetch::PageFetcher;
use crate::infrastructure::markup::MarkupScanner;
use crate::infrastructure::notify::NotifyBackend;
use crate::infrastructure::store::{HistoryStore, SnapshotStore};
use crate::shared::errors::AppError;
use crate::shared::types::{PriceSnapshot, SnapshotStatus};
use crate::shared::utils::{format_price, generate_id};

/// Samples feeding the rolling average shown in notifications
const ROLLING_AVERAGE_WINDOW: usize = 24;

/// Counters for the polling loop's periodic report
#[derive(Debug, Clone)]
pub struct MonitorStats {
    pub start_time: Instant,
    pub cycles_completed: u64,
    pub notifications_sent: u64,
    pub last_status: Option<SnapshotStatus>,
    pub last_min_price: Option<u32>,
}

impl MonitorStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            cycles_completed: 0,
            notifications_sent: 0,
            last_status: None,
            last_min_price: None,
        }
    }

    pub fn uptime_minutes(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() / 60.0
    }
}

impl Default for MonitorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled pipeline for one monitored target
pub struct FareMonitor {
    url: String,
    fetcher: Box<dyn PageFetcher>,
    scanner: MarkupScanner,
    extractor: PriceExtractor,
    snapshot_store: Box<dyn SnapshotStore>,
    history_store: Box<dyn HistoryStore>,
    composer: NotificationComposer,
    notifier: Box<dyn NotifyBackend>,
    graph: LineGraph,
    history_capacity: usize,
    stats: MonitorStats,
}

impl FareMonitor {
    pub fn new(
        url: String,
        fetcher: Box<dyn PageFetcher>,
        scanner: MarkupScanner,
        extractor: PriceExtractor,
        snapshot_store: Box<dyn SnapshotStore>,
        history_store: Box<dyn HistoryStore>,
        composer: NotificationComposer,
        notifier: Box<dyn NotifyBackend>,
        history_capacity: usize,
    ) -> Self {
        Self {
            url,
            fetcher,
            scanner,
            extractor,
            snapshot_store,
            history_store,
            composer,
            notifier,
            graph: LineGraph::default(),
            history_capacity,
            stats: MonitorStats::new(),
        }
    }

    /// Run one full check cycle and return the classified event
    pub async fn check_once(&mut self) -> Result<NotificationEvent, AppError> {
        let check_id = generate_id();
        info!("🔍 Checking fares ({}, fetcher={})", check_id, self.fetcher.name());

        let current = match self.fetcher.fetch(&self.url).await {
            Ok(html) => {
                let page = self.scanner.scan(&html);
                self.extractor.extract(&page)
            }
            Err(e) => {
                error!("❌ Fetch failed: {}", e);
                PriceSnapshot::error(e.to_string())
            }
        };

        let previous = self.snapshot_store.load();
        let event = detect(&current, previous.as_ref());

        let mut history =
            HistoryLog::from_entries(self.history_store.load(), self.history_capacity);

        if current.is_success() {
            if let (Some(min), Some(timestamp)) = (current.min_price, current.timestamp) {
                history.append(min, timestamp);
                if let Err(e) = self.history_store.save(&history.to_vec()) {
                    warn!("Failed to persist history: {}", e);
                }
            }
        }

        self.log_outcome(&current);

        let entries = history.to_vec();
        let trend = TrendSummary {
            sparkline: if entries.is_empty() {
                None
            } else {
                Some(sparkline(&entries))
            },
            average: history.rolling_average(ROLLING_AVERAGE_WINDOW),
        };

        if current.is_success() && entries.len() >= 2 {
            info!("📈 Price trend:\n{}", self.graph.render(&entries));
        }

        if let Some(message) = self.composer.compose(&event, &trend) {
            match self.notifier.send(&message).await {
                Ok(()) => {
                    self.stats.notifications_sent += 1;
                    info!("📤 Notification sent via {}", self.notifier.name());
                }
                Err(e) => warn!("Notification delivery failed: {}", e),
            }
        }

        // Failed extractions never overwrite the comparison baseline
        match current.status {
            SnapshotStatus::Success | SnapshotStatus::NoAvailability => {
                if let Err(e) = self.snapshot_store.save(&current) {
                    warn!("Failed to persist snapshot: {}", e);
                }
            }
            SnapshotStatus::NoPriceFound | SnapshotStatus::Error => {}
        }

        self.stats.cycles_completed += 1;
        self.stats.last_status = Some(current.status);
        self.stats.last_min_price = current.min_price;

        Ok(event)
    }

    fn log_outcome(&self, snapshot: &PriceSnapshot) {
        match snapshot.status {
            SnapshotStatus::Success => {
                info!("✅ Prices extracted");
                if let (Some(min), Some(max)) = (snapshot.min_price, snapshot.max_price) {
                    info!("   Lowest: {}円, highest: {}円", format_price(min), format_price(max));
                }
                let all: Vec<String> = snapshot
                    .prices
                    .iter()
                    .map(|p| format!("{}円", format_price(*p)))
                    .collect();
                info!("   All fares: {}", all.join(", "));
            }
            SnapshotStatus::NoAvailability => {
                info!("⚠️  No departures listed (possibly sold out or not on sale yet)");
            }
            SnapshotStatus::NoPriceFound => {
                warn!("⚠️  Page loaded but no plausible price found");
            }
            SnapshotStatus::Error => {
                error!("❌ Check failed: {}", snapshot.message.as_deref().unwrap_or("unknown"));
            }
        }
    }

    pub fn print_stats(&self) {
        info!("📊 Monitor stats:");
        info!("   Uptime: {:.1} min", self.stats.uptime_minutes());
        info!("   Cycles completed: {}", self.stats.cycles_completed);
        info!("   Notifications sent: {}", self.stats.notifications_sent);
        if let Some(min) = self.stats.last_min_price {
            info!("   Last lowest fare: {}円", format_price(min));
        }
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }
}
