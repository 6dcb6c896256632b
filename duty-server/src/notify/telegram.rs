//! Telegram Bot API sink (REST, no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::Notifier;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, api_base: Option<&str>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            token: token.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, recipient: &str, text: &str) -> bool {
        let body = SendMessage {
            chat_id: recipient,
            text,
        };
        let resp = match self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                // Strip the URL: it carries the bot token
                tracing::warn!(recipient, error = %e.without_url(), "Telegram request failed");
                return false;
            }
        };

        let status = resp.status();
        if status.is_success() {
            return true;
        }
        let detail: serde_json::Value = resp.json().await.unwrap_or_default();
        tracing::warn!(
            recipient,
            status = status.as_u16(),
            description = detail["description"].as_str().unwrap_or(""),
            "Telegram rejected message"
        );
        false
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
