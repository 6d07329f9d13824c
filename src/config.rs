use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct TargetCfg {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookCfg {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageCfg {
    pub snapshot_file: String,
    pub history_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorCfg {
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    pub currency_marker: Option<String>,
    pub unavailability_phrases: Option<Vec<String>>,
    pub class_pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorCfg {
    pub interval_secs: Option<u64>,
    pub history_capacity: Option<usize>,
    pub notify_unchanged: Option<bool>,
    pub notify_still_unavailable: Option<bool>,
    pub notify_extraction_failed: Option<bool>,
    pub footer_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetCfg,
    pub webhook: Option<WebhookCfg>,
    pub storage: Option<StorageCfg>,
    pub extractor: Option<ExtractorCfg>,
    pub monitor: Option<MonitorCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let cfg: Config = toml::from_str(
            r#"
            [target]
            url = "https://example.com/searchbus/tokyo_akita/"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.target.url, "https://example.com/searchbus/tokyo_akita/");
        assert!(cfg.webhook.is_none());
        assert!(cfg.extractor.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let cfg: Config = toml::from_str(
            r#"
            [target]
            url = "https://example.com/searchbus/tokyo_akita/"

            [webhook]
            url = "https://discord.com/api/webhooks/123/abc"

            [storage]
            snapshot_file = "prices.json"
            history_file = "history.json"

            [extractor]
            min_price = 2000
            max_price = 30000
            currency_marker = "円"

            [monitor]
            interval_secs = 1800
            history_capacity = 50
            notify_unchanged = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.webhook.unwrap().url, "https://discord.com/api/webhooks/123/abc");
        assert_eq!(cfg.extractor.as_ref().unwrap().min_price, Some(2000));
        assert_eq!(cfg.monitor.as_ref().unwrap().interval_secs, Some(1800));
        assert_eq!(cfg.monitor.as_ref().unwrap().notify_unchanged, Some(false));
    }
}
