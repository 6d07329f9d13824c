//! Price extraction heuristic.
//!
//! Two independent scans feed one candidate list: a currency-marker pattern
//! over free text, and a class-name pattern over tagged elements. The
//! plausibility window is the only safeguard against numeric noise, so both
//! scans stay deliberately greedy.

use chrono::Utc;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::shared::errors::AppError;
use crate::shared::types::{PlausibilityWindow, PriceSnapshot};

use super::page::{PageContent, TaggedElement};

/// Extraction heuristic tuning
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub window: PlausibilityWindow,
    /// Currency marker that anchors the free-text scan
    pub currency_marker: String,
    /// Case-insensitive pattern matched against element class attributes
    pub class_pattern: String,
    /// Phrases that mark the page as having no bookable departures
    pub unavailability_phrases: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            window: PlausibilityWindow::default(),
            currency_marker: "円".to_string(),
            class_pattern: "price|fare|amount".to_string(),
            unavailability_phrases: vec!["該当するバスは見つかりませんでした".to_string()],
        }
    }
}

/// Turns a parsed page view into exactly one classified snapshot
pub struct PriceExtractor {
    window: PlausibilityWindow,
    currency_marker: String,
    unavailability_phrases: Vec<String>,
    currency_re: Regex,
    digits_re: Regex,
    class_re: Regex,
}

impl PriceExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, AppError> {
        let currency_re = Regex::new(&format!(
            r"([\d,]+)\s*{}",
            regex::escape(&config.currency_marker)
        ))
        .map_err(|e| AppError::ConfigError(format!("Invalid currency pattern: {}", e)))?;

        let digits_re = Regex::new(r"([\d,]+)").expect("static digits pattern");

        let class_re = RegexBuilder::new(&config.class_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Invalid class pattern: {}", e)))?;

        Ok(Self {
            window: config.window,
            currency_marker: config.currency_marker,
            unavailability_phrases: config.unavailability_phrases,
            currency_re,
            digits_re,
            class_re,
        })
    }

    /// Scan stripped text nodes for digit groups anchored to the currency
    /// marker. Malformed groups are skipped, never fatal.
    pub fn scan_text_nodes(&self, text_nodes: &[String]) -> Vec<u32> {
        let mut prices = Vec::new();
        for node in text_nodes {
            if !node.contains(&self.currency_marker) {
                continue;
            }
            for captures in self.currency_re.captures_iter(node) {
                if let Some(price) = parse_digit_group(&captures[1]) {
                    if self.window.contains(price) {
                        prices.push(price);
                    }
                }
            }
        }
        prices
    }

    /// Scan elements whose class attribute looks price-related and take
    /// every digit group from their text, marker or not.
    pub fn scan_price_elements(&self, elements: &[TaggedElement]) -> Vec<u32> {
        let mut prices = Vec::new();
        for element in elements {
            if !self.class_re.is_match(&element.class_attr) {
                continue;
            }
            for captures in self.digits_re.captures_iter(&element.text) {
                if let Some(price) = parse_digit_group(&captures[1]) {
                    if self.window.contains(price) {
                        prices.push(price);
                    }
                }
            }
        }
        prices
    }

    /// Produce exactly one classified snapshot for the page
    pub fn extract(&self, page: &PageContent) -> PriceSnapshot {
        let mut prices = self.scan_text_nodes(&page.text_nodes);
        prices.extend(self.scan_price_elements(&page.elements));

        prices.sort_unstable();
        prices.dedup();

        // An explicit availability message overrides any stray numeric
        // matches elsewhere on the page
        let full_text = page.full_text();
        for phrase in &self.unavailability_phrases {
            if full_text.contains(phrase.as_str()) {
                debug!("Availability phrase matched: {}", phrase);
                return PriceSnapshot::no_availability(phrase.clone());
            }
        }

        if prices.is_empty() {
            return PriceSnapshot::no_price_found("No plausible price found on page");
        }

        PriceSnapshot::success(prices, Utc::now())
    }
}

/// Parse one digit group, stripping thousands separators
fn parse_digit_group(group: &str) -> Option<u32> {
    group.replace(',', "").parse::<u32>().ok()
}
