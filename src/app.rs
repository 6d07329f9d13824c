// src/app.rs
use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use farewatch::application::monitor::FareMonitor;
use farewatch::domain::extraction::{ExtractorConfig, PriceExtractor};
use farewatch::domain::history::DEFAULT_HISTORY_CAPACITY;
use farewatch::domain::notification::{NotificationComposer, NotifyPolicy};
use farewatch::infrastructure::fetch::{DemoPageFetcher, HttpPageFetcher, PageFetcher};
use farewatch::infrastructure::markup::MarkupScanner;
use farewatch::infrastructure::notify::{ConsoleNotifier, DiscordWebhook, NotifyBackend};
use farewatch::infrastructure::store::{JsonHistoryStore, JsonSnapshotStore};
use farewatch::shared::types::PlausibilityWindow;

use crate::config::Config;

const DEFAULT_SNAPSHOT_FILE: &str = "prices.json";
const DEFAULT_HISTORY_FILE: &str = "history.json";
const DEFAULT_INTERVAL_SECS: u64 = 3600;
const DEFAULT_FOOTER_TEXT: &str = "さくら高速バス 価格監視";

/// Cycles between periodic stats reports in polling mode
const STATS_EVERY_CYCLES: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub url: String,
    pub webhook_url: Option<String>,
    pub snapshot_file: String,
    pub history_file: String,
    pub interval_secs: u64,
    pub once: bool,
    pub demo: bool,
    pub extractor: ExtractorConfig,
    pub history_capacity: usize,
    pub notify_policy: NotifyPolicy,
    pub footer_text: String,
}

impl AppCfg {
    pub fn from_config(cfg: Config, once_override: bool) -> Result<Self> {
        let mut extractor = ExtractorConfig::default();
        if let Some(ex) = &cfg.extractor {
            let min = ex.min_price.unwrap_or(extractor.window.min);
            let max = ex.max_price.unwrap_or(extractor.window.max);
            extractor.window = PlausibilityWindow::new(min, max);
            if let Some(marker) = &ex.currency_marker {
                extractor.currency_marker = marker.clone();
            }
            if let Some(pattern) = &ex.class_pattern {
                extractor.class_pattern = pattern.clone();
            }
            if let Some(phrases) = &ex.unavailability_phrases {
                extractor.unavailability_phrases = phrases.clone();
            }
        }

        let mut notify_policy = NotifyPolicy::default();
        let monitor = cfg.monitor.as_ref();
        if let Some(m) = monitor {
            if let Some(v) = m.notify_unchanged {
                notify_policy.notify_unchanged = v;
            }
            if let Some(v) = m.notify_still_unavailable {
                notify_policy.notify_still_unavailable = v;
            }
            if let Some(v) = m.notify_extraction_failed {
                notify_policy.notify_extraction_failed = v;
            }
        }

        let (snapshot_file, history_file) = match &cfg.storage {
            Some(s) => (s.snapshot_file.clone(), s.history_file.clone()),
            None => (DEFAULT_SNAPSHOT_FILE.to_string(), DEFAULT_HISTORY_FILE.to_string()),
        };

        Ok(Self {
            url: cfg.target.url,
            webhook_url: cfg.webhook.map(|w| w.url),
            snapshot_file,
            history_file,
            interval_secs: monitor
                .and_then(|m| m.interval_secs)
                .unwrap_or(DEFAULT_INTERVAL_SECS),
            once: once_override,
            demo: false,
            extractor,
            history_capacity: monitor
                .and_then(|m| m.history_capacity)
                .unwrap_or(DEFAULT_HISTORY_CAPACITY),
            notify_policy,
            footer_text: monitor
                .and_then(|m| m.footer_text.clone())
                .unwrap_or_else(|| DEFAULT_FOOTER_TEXT.to_string()),
        })
    }

    pub fn from_cli_args(
        url: String,
        webhook_url: Option<String>,
        once: bool,
        demo: bool,
    ) -> Result<Self> {
        Ok(Self {
            url,
            webhook_url,
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            history_file: DEFAULT_HISTORY_FILE.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            once,
            demo,
            extractor: ExtractorConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            notify_policy: NotifyPolicy::default(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
        })
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting fare monitor");
    info!("Configuration: {:?}", app_cfg);

    reqwest::Url::parse(&app_cfg.url)
        .map_err(|e| anyhow::anyhow!("Invalid target URL {}: {}", app_cfg.url, e))?;

    let fetcher: Box<dyn PageFetcher> = if app_cfg.demo {
        info!("🧪 Demo mode - serving generated markup, no network access");
        Box::new(DemoPageFetcher::new())
    } else {
        Box::new(HttpPageFetcher::new()?)
    };

    let notifier: Box<dyn NotifyBackend> = match &app_cfg.webhook_url {
        Some(webhook_url) => Box::new(DiscordWebhook::new(webhook_url.clone())),
        None => {
            info!("No webhook configured - notifications go to the console");
            Box::new(ConsoleNotifier)
        }
    };

    let monitor = FareMonitor::new(
        app_cfg.url.clone(),
        fetcher,
        MarkupScanner::new(),
        PriceExtractor::new(app_cfg.extractor.clone())?,
        Box::new(JsonSnapshotStore::new(&app_cfg.snapshot_file)),
        Box::new(JsonHistoryStore::new(&app_cfg.history_file)),
        NotificationComposer::new(
            app_cfg.url.clone(),
            app_cfg.footer_text.clone(),
            app_cfg.notify_policy,
        ),
        notifier,
        app_cfg.history_capacity,
    );

    run_polling_mode(app_cfg, monitor).await
}

async fn run_polling_mode(app_cfg: AppCfg, mut monitor: FareMonitor) -> Result<()> {
    if app_cfg.once {
        info!("Running a single check");
    } else {
        info!("Polling every {}s", app_cfg.interval_secs);
    }

    let mut interval = tokio::time::interval(Duration::from_secs(app_cfg.interval_secs));
    let mut cycles_since_stats = 0u64;

    loop {
        interval.tick().await;

        if let Err(e) = monitor.check_once().await {
            error!("❌ Check cycle failed: {}", e);
        }

        if app_cfg.once {
            monitor.print_stats();
            break;
        }

        cycles_since_stats += 1;
        if cycles_since_stats >= STATS_EVERY_CYCLES {
            monitor.print_stats();
            cycles_since_stats = 0;
        }
    }

    Ok(())
}
