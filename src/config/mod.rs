/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

/// Telegram bot credentials from environment variables
pub mod telegram;
