use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::TelegramConfig;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Minimal Bot API client that can post text messages to one chat.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    endpoint: Url,
    chat_id: String,
}

impl TelegramClient {
    /// Returns `Ok(None)` when the bot token or chat id is not configured.
    pub fn from_config(config: &TelegramConfig) -> Result<Option<Self>> {
        let (Some(token), Some(chat_id)) = (
            config.bot_token.as_deref().filter(|t| !t.is_empty()),
            config.chat_id.as_deref().filter(|c| !c.is_empty()),
        ) else {
            return Ok(None);
        };

        let mut endpoint = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid Telegram API base URL: {}", config.api_base_url))?;
        endpoint
            .path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Telegram API base URL cannot carry a path"))?
            .pop_if_empty()
            .push(&format!("bot{token}"))
            .push("sendMessage");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent("EduHub/1.0")
            .build()
            .context("Failed to build Telegram HTTP client")?;

        Ok(Some(Self {
            client,
            endpoint,
            chat_id: chat_id.to_string(),
        }))
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .context("Telegram request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Telegram send failed: {status} {body}");
        }

        debug!("Telegram message delivered to chat {}", self.chat_id);
        Ok(())
    }
}
