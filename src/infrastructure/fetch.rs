//! Page fetching collaborators.
//!
//! The monitor only ever sees the `PageFetcher` trait; retry and scheduling
//! stay with the caller. `HttpPageFetcher` talks to the live booking site,
//! `DemoPageFetcher` serves generated markup for offline runs.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::shared::errors::{AppError, FetchError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Yields the raw markup of the monitored page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
    fn name(&self) -> &str;
}

/// Live fetcher with browser-like headers; the booking site rejects
/// obviously scripted clients
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "ja,en-US;q=0.9,en;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Offline fetcher that renders a drifting fare ladder as markup.
/// Roughly one tick in three moves the lowest fare by a few hundred yen,
/// never below the floor.
pub struct DemoPageFetcher {
    prices: Mutex<Vec<u32>>,
}

const DEMO_BASE_PRICES: [u32; 4] = [6300, 7000, 7300, 8000];
const DEMO_PRICE_FLOOR: u32 = 5000;
const DEMO_DRIFT_STEPS: [i32; 4] = [-500, -300, 300, 500];

impl DemoPageFetcher {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(DEMO_BASE_PRICES.to_vec()),
        }
    }

    fn drift(&self) -> Vec<u32> {
        let mut prices = self.prices.lock().expect("demo price lock");
        let mut rng = rand::thread_rng();
        if rng.gen_bool(0.3) {
            let step = DEMO_DRIFT_STEPS[rng.gen_range(0..DEMO_DRIFT_STEPS.len())];
            let moved = (prices[0] as i32 + step).max(DEMO_PRICE_FLOOR as i32) as u32;
            prices[0] = moved;
            prices.sort_unstable();
        }
        prices.clone()
    }
}

#[async_trait]
impl PageFetcher for DemoPageFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        let prices = self.drift();
        let min = prices.iter().min().copied().unwrap_or(DEMO_PRICE_FLOOR);

        let mut rows = String::new();
        for price in &prices {
            rows.push_str(&format!(
                "<td class=\"fare-amount\">{}円</td>",
                crate::shared::utils::format_price(*price)
            ));
        }

        Ok(format!(
            "<html><body><p>最安値 {}円 から</p><table><tr>{}</tr></table></body></html>",
            crate::shared::utils::format_price(min),
            rows
        ))
    }

    fn name(&self) -> &str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_fetcher_serves_extractable_markup() {
        let fetcher = DemoPageFetcher::new();
        let html = fetcher.fetch("https://example.com").await.unwrap();
        assert!(html.contains("fare-amount"));
        assert!(html.contains("円"));
    }

    #[tokio::test]
    async fn test_demo_prices_stay_at_or_above_floor() {
        let fetcher = DemoPageFetcher::new();
        for _ in 0..200 {
            fetcher.fetch("https://example.com").await.unwrap();
        }
        let prices = fetcher.prices.lock().unwrap();
        assert!(prices.iter().all(|p| *p >= DEMO_PRICE_FLOOR));
    }
}
