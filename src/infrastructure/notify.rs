//! Outbound notification delivery.
//!
//! The composer produces a transport-agnostic message; backends only decide
//! where it goes. Delivery failure is the caller's to log and swallow - a
//! missed notification must never lose a state update.

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::notification::Notification;
use crate::shared::errors::NotifyError;

#[async_trait]
pub trait NotifyBackend: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
    fn name(&self) -> &str;
}

/// Discord incoming-webhook backend posting the message as an embed
pub struct DiscordWebhook {
    webhook_url: String,
    http: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotifyBackend for DiscordWebhook {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = json!({ "embeds": [notification] });

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Webhook returned {}: {}", status, body);
            return Err(NotifyError::Status(status.as_u16()));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "discord"
    }
}

/// Prints the composed message instead of delivering it; used for demo runs
/// and deployments without a webhook configured
pub struct ConsoleNotifier;

#[async_trait]
impl NotifyBackend for ConsoleNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!("📣 {}", notification.title);
        if let Some(description) = &notification.description {
            info!("   {}", description);
        }
        for field in &notification.fields {
            info!("   {}: {}", field.name, field.value);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{EmbedField, EmbedFooter};
    use chrono::Utc;

    fn notification() -> Notification {
        Notification {
            title: "💰 値下がり検出！".to_string(),
            description: Some("**500円 安くなりました！**".to_string()),
            color: 0x00ff00,
            fields: vec![EmbedField {
                name: "現在の価格(非会員)".to_string(),
                value: "**6,500円**".to_string(),
                inline: false,
            }],
            timestamp: Utc::now(),
            footer: EmbedFooter {
                text: "さくら高速バス 価格監視".to_string(),
            },
        }
    }

    #[test]
    fn test_webhook_payload_wraps_embed() {
        let message = notification();
        let payload = json!({ "embeds": [&message] });
        let embeds = payload["embeds"].as_array().unwrap();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0]["color"], 0x00ff00);
        assert_eq!(embeds[0]["footer"]["text"], "さくら高速バス 価格監視");
    }

    #[tokio::test]
    async fn test_console_notifier_never_fails() {
        let notifier = ConsoleNotifier;
        assert!(notifier.send(&notification()).await.is_ok());
    }
}
