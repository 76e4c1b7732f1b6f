//! Outbound delivery through the Telegram Bot API `sendMessage` method

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::ChatId;
use crate::error::{RelayError, Result};

pub const DEFAULT_API_DOMAIN: &str = "api.telegram.org";
const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends messages to Telegram. Cheap to clone; the underlying client is shared.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
}

impl TelegramNotifier {
    /// Builds a notifier whose requests time out after `timeout`.
    pub fn new(api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, api_base))
    }

    fn with_client(client: Client, api_base: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Posts `text` to the chat (and thread, if given). One attempt, no retry.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &ChatId,
        thread_id: Option<i64>,
        text: &str,
    ) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);
        let request = SendMessageRequest {
            chat_id,
            message_thread_id: thread_id,
            text,
            parse_mode: PARSE_MODE,
            disable_web_page_preview: true,
        };

        debug!("Sending Telegram message to chat {}", chat_id);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            // the URL embeds the bot token
            .map_err(|e| RelayError::DeliveryFailed(e.without_url().to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse {
                description: Some(description),
                ..
            }) => {
                error!("Telegram API error (HTTP {}): {}", status, description);
                Err(RelayError::DeliveryFailed(description))
            }
            _ => {
                error!("Telegram API error (HTTP {}): {}", status, body);
                Err(RelayError::DeliveryFailed(format!(
                    "Telegram API returned HTTP {}",
                    status
                )))
            }
        }
    }
}

/// Turns `TELEGRAM_API_DOMAIN` into a base URL. Values that already carry a
/// scheme are used as-is.
pub fn api_base_from_domain(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    }
}
