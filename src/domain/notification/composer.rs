//! Maps a classified change event into a structured, transport-agnostic
//! message shaped like a webhook embed.

use chrono::Utc;
use serde::Serialize;

use crate::domain::detection::NotificationEvent;
use crate::shared::utils::format_price;

/// Enumerated visual/delivery priority of a notification event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Decrease,
    Increase,
    Unchanged,
    Initial,
    Unavailable,
}

impl Severity {
    /// Fixed embed color codes, one per severity
    pub fn color(&self) -> u32 {
        match self {
            Severity::Decrease => 0x00ff00,
            Severity::Increase => 0xffa500,
            Severity::Unchanged => 0x808080,
            Severity::Initial => 0x0000ff,
            Severity::Unavailable => 0xff0000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Transport-agnostic outbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: chrono::DateTime<Utc>,
    pub footer: EmbedFooter,
}

/// Optional trend block attached to price notifications
#[derive(Debug, Clone, Default)]
pub struct TrendSummary {
    pub sparkline: Option<String>,
    /// Rolling mean of the most recent 24 samples
    pub average: Option<f64>,
}

/// Which low-priority events still produce an outbound message.
/// Decrease/increase/initial/became-unavailable always deliver.
#[derive(Debug, Clone, Copy)]
pub struct NotifyPolicy {
    pub notify_unchanged: bool,
    pub notify_still_unavailable: bool,
    pub notify_extraction_failed: bool,
}

impl Default for NotifyPolicy {
    fn default() -> Self {
        // The original deployment reported every successful check and kept
        // quiet about repeated misses
        Self {
            notify_unchanged: true,
            notify_still_unavailable: false,
            notify_extraction_failed: false,
        }
    }
}

pub struct NotificationComposer {
    booking_url: String,
    footer_text: String,
    policy: NotifyPolicy,
}

impl NotificationComposer {
    pub fn new(booking_url: String, footer_text: String, policy: NotifyPolicy) -> Self {
        Self {
            booking_url,
            footer_text,
            policy,
        }
    }

    /// Compose the outbound message for an event; None means suppressed
    pub fn compose(
        &self,
        event: &NotificationEvent,
        trend: &TrendSummary,
    ) -> Option<Notification> {
        match event {
            NotificationEvent::Initial(snapshot) => {
                let min = snapshot.min_price.unwrap_or(0);
                Some(self.price_message(
                    Severity::Initial,
                    "🚌 監視開始".to_string(),
                    None,
                    min,
                    trend,
                ))
            }
            NotificationEvent::PriceDecreased { current_min, delta, .. } => {
                Some(self.price_message(
                    Severity::Decrease,
                    "💰 値下がり検出！".to_string(),
                    Some(format!("**{}円 安くなりました！**", format_price(*delta))),
                    *current_min,
                    trend,
                ))
            }
            NotificationEvent::PriceIncreased { current_min, delta, .. } => {
                Some(self.price_message(
                    Severity::Increase,
                    "📈 値上がり検出".to_string(),
                    Some(format!("{}円 高くなりました", format_price(*delta))),
                    *current_min,
                    trend,
                ))
            }
            NotificationEvent::Unchanged(min) => {
                if !self.policy.notify_unchanged {
                    return None;
                }
                Some(self.price_message(
                    Severity::Unchanged,
                    "📊 価格確認".to_string(),
                    Some("価格に変動はありません".to_string()),
                    *min,
                    trend,
                ))
            }
            NotificationEvent::BecameUnavailable => Some(Notification {
                title: "⚠️ バスが見つかりませんでした".to_string(),
                description: Some("満席になったか、販売が終了した可能性があります".to_string()),
                color: Severity::Unavailable.color(),
                fields: vec![self.link_field()],
                timestamp: Utc::now(),
                footer: self.footer(),
            }),
            NotificationEvent::StillUnavailable => {
                if !self.policy.notify_still_unavailable {
                    return None;
                }
                Some(Notification {
                    title: "⚠️ バスは引き続き見つかりません".to_string(),
                    description: None,
                    color: Severity::Unavailable.color(),
                    fields: vec![self.link_field()],
                    timestamp: Utc::now(),
                    footer: self.footer(),
                })
            }
            NotificationEvent::ExtractionFailed(reason) => {
                if !self.policy.notify_extraction_failed {
                    return None;
                }
                Some(Notification {
                    title: "❌ 価格取得エラー".to_string(),
                    description: Some(reason.clone()),
                    color: Severity::Unchanged.color(),
                    fields: Vec::new(),
                    timestamp: Utc::now(),
                    footer: self.footer(),
                })
            }
        }
    }

    fn price_message(
        &self,
        severity: Severity,
        title: String,
        description: Option<String>,
        min_price: u32,
        trend: &TrendSummary,
    ) -> Notification {
        let mut fields = vec![
            EmbedField {
                name: "現在の価格(非会員)".to_string(),
                value: format!("**{}円**", format_price(min_price)),
                inline: false,
            },
            self.link_field(),
        ];

        if let Some(sparkline) = &trend.sparkline {
            fields.push(EmbedField {
                name: "📊 価格推移".to_string(),
                value: sparkline.clone(),
                inline: false,
            });
        }
        if let Some(average) = trend.average {
            fields.push(EmbedField {
                name: "直近24回平均".to_string(),
                value: format!("{}円", format_price(average.round() as u32)),
                inline: true,
            });
        }

        Notification {
            title,
            description,
            color: severity.color(),
            fields,
            timestamp: Utc::now(),
            footer: self.footer(),
        }
    }

    fn link_field(&self) -> EmbedField {
        EmbedField {
            name: "🔗 予約ページへ".to_string(),
            value: format!("[こちらをクリック]({})", self.booking_url),
            inline: false,
        }
    }

    fn footer(&self) -> EmbedFooter {
        EmbedFooter {
            text: self.footer_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::PriceSnapshot;
    use chrono::Utc;

    fn composer(policy: NotifyPolicy) -> NotificationComposer {
        NotificationComposer::new(
            "https://example.com/searchbus/tokyo_akita/".to_string(),
            "さくら高速バス 価格監視".to_string(),
            policy,
        )
    }

    #[test]
    fn test_severity_color_table() {
        assert_eq!(Severity::Decrease.color(), 0x00ff00);
        assert_eq!(Severity::Increase.color(), 0xffa500);
        assert_eq!(Severity::Unchanged.color(), 0x808080);
        assert_eq!(Severity::Initial.color(), 0x0000ff);
        assert_eq!(Severity::Unavailable.color(), 0xff0000);
    }

    #[test]
    fn test_decrease_always_composes() {
        let composer = composer(NotifyPolicy {
            notify_unchanged: false,
            notify_still_unavailable: false,
            notify_extraction_failed: false,
        });
        let event = NotificationEvent::PriceDecreased {
            previous_min: 7000,
            current_min: 6500,
            delta: 500,
        };
        let message = composer.compose(&event, &TrendSummary::default()).unwrap();

        assert_eq!(message.color, 0x00ff00);
        assert!(message.description.unwrap().contains("500円"));
        assert_eq!(message.fields[0].value, "**6,500円**");
        assert!(message.fields[1].value.contains("https://example.com"));
    }

    #[test]
    fn test_unchanged_respects_policy() {
        let silent = composer(NotifyPolicy {
            notify_unchanged: false,
            ..NotifyPolicy::default()
        });
        assert!(silent
            .compose(&NotificationEvent::Unchanged(7000), &TrendSummary::default())
            .is_none());

        let chatty = composer(NotifyPolicy::default());
        let message = chatty
            .compose(&NotificationEvent::Unchanged(7000), &TrendSummary::default())
            .unwrap();
        assert_eq!(message.color, 0x808080);
    }

    #[test]
    fn test_became_unavailable_always_composes() {
        let composer = composer(NotifyPolicy {
            notify_unchanged: false,
            notify_still_unavailable: false,
            notify_extraction_failed: false,
        });
        let message = composer
            .compose(&NotificationEvent::BecameUnavailable, &TrendSummary::default())
            .unwrap();
        assert_eq!(message.color, 0xff0000);
    }

    #[test]
    fn test_extraction_failed_suppressed_by_default() {
        let composer = composer(NotifyPolicy::default());
        let event = NotificationEvent::ExtractionFailed("timeout".to_string());
        assert!(composer.compose(&event, &TrendSummary::default()).is_none());
    }

    #[test]
    fn test_trend_block_and_average_fields() {
        let composer = composer(NotifyPolicy::default());
        let snapshot = PriceSnapshot::success(vec![6300, 7000], Utc::now());
        let trend = TrendSummary {
            sparkline: Some("▁▄█".to_string()),
            average: Some(6650.0),
        };
        let message = composer
            .compose(&NotificationEvent::Initial(snapshot), &trend)
            .unwrap();

        assert_eq!(message.color, 0x0000ff);
        let trend_field = message.fields.iter().find(|f| f.value == "▁▄█").unwrap();
        assert!(!trend_field.inline);
        assert!(message.fields.iter().any(|f| f.value == "6,650円"));
    }

    #[test]
    fn test_embed_serialization_shape() {
        let composer = composer(NotifyPolicy::default());
        let event = NotificationEvent::PriceIncreased {
            previous_min: 6500,
            current_min: 7000,
            delta: 500,
        };
        let message = composer.compose(&event, &TrendSummary::default()).unwrap();
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["color"], 0xffa500);
        assert!(json["fields"].as_array().unwrap().len() >= 2);
        assert_eq!(json["footer"]["text"], "さくら高速バス 価格監視");
    }
}
