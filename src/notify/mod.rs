//! Outbound notification channels.
//!
//! The reminder scan only knows the [`Notifier`] trait; [`TelegramSender`] is the
//! production implementation.

mod telegram;

pub use telegram::TelegramSender;

use async_trait::async_trait;

/// Something that can deliver a text message to an address.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `text` to `address`.
    ///
    /// Returns the channel's response body on success and `None` on any failure.
    /// Implementations log their own failures and never panic.
    async fn notify(&self, address: &str, text: &str) -> Option<serde_json::Value>;
}
