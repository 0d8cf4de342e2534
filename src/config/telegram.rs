//! Telegram bot credentials from environment variables.

use crate::errors::{Error, Result};
use std::env;

const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org/bot";

/// Where and as whom reminders are sent.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API prefix; the token is appended directly, e.g. `https://api.telegram.org/bot`
    pub base_url: String,
    /// Bot token issued by `BotFather`
    pub bot_token: String,
}

impl TelegramConfig {
    /// Reads `TELEGRAM_BOT_TOKEN` (required) and `TELEGRAM_URL` (optional).
    ///
    /// # Errors
    /// Returns an error if the token is unset or blank.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")?;
        if bot_token.trim().is_empty() {
            return Err(Error::Config {
                message: "TELEGRAM_BOT_TOKEN is empty".to_string(),
            });
        }

        let base_url =
            env::var("TELEGRAM_URL").unwrap_or_else(|_| DEFAULT_TELEGRAM_URL.to_string());

        Ok(Self {
            base_url,
            bot_token: bot_token.trim().to_string(),
        })
    }

    /// Full URL of the `sendMessage` method.
    #[must_use]
    pub fn send_message_url(&self) -> String {
        format!("{}{}/sendMessage", self.base_url, self.bot_token)
    }
}

// The token never shows up in logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("base_url", &self.base_url)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}
