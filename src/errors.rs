use crate::core::rules::ValidationErrors;
use thiserror::Error;

/// Unified error type for the habit tracker
#[derive(Debug, Error)]
pub enum Error {
    /// Database query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A required environment variable is missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Submitted habit or periodicity data broke one or more rules
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No user with this id exists
    #[error("User not found: {id}")]
    UserNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// A user with this email is already registered
    #[error("User already exists: {email}")]
    UserAlreadyExists {
        /// The duplicate email
        email: String,
    },

    /// The email address is empty or malformed
    #[error("Invalid email address: '{email}'")]
    InvalidEmail {
        /// The rejected email
        email: String,
    },

    /// No habit with this id exists for the requesting user
    #[error("Habit not found: {id}")]
    HabitNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No periodicity with this id exists
    #[error("Periodicity not found: {id}")]
    PeriodicityNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Outbound notification request failed
    #[error("Notification error: {0}")]
    Notification(#[from] reqwest::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
