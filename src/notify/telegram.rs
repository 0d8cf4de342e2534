//! Telegram Bot API sender.

use super::Notifier;
use crate::{
    config::telegram::TelegramConfig,
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends messages through the Telegram `sendMessage` method.
#[derive(Clone)]
pub struct TelegramSender {
    client: reqwest::Client,
    endpoint: String,
}

impl TelegramSender {
    /// Builds a sender for the configured bot.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Notification(e.without_url()))?;

        Ok(Self {
            client,
            endpoint: config.send_message_url(),
        })
    }

    async fn try_send_message(&self, chat_id: &str, text: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("text", text), ("chat_id", chat_id)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Notification(e.without_url()))?;

        response
            .json()
            .await
            .map_err(|e| Error::Notification(e.without_url()))
    }

    /// Sends `text` to `chat_id`.
    ///
    /// Failures are logged and reported as `None`; the request URL carries the bot
    /// token, so it is stripped from every logged error.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Option<serde_json::Value> {
        match self.try_send_message(chat_id, text).await {
            Ok(body) => {
                debug!("Delivered message to chat {chat_id}");
                Some(body)
            }
            Err(e) => {
                warn!("Failed to send Telegram message to chat {chat_id}: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramSender {
    async fn notify(&self, address: &str, text: &str) -> Option<serde_json::Value> {
        self.send_message(address, text).await
    }
}
