//! Shared test utilities for `HabitBuddy`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and a notifier that records
//! instead of sending.

use crate::{
    core::{
        habit::{self, NewHabit},
        user,
    },
    entities,
    errors::Result,
    notify::Notifier,
};
use async_trait::async_trait;
use chrono::NaiveTime;
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a whole-minute time of day.
///
/// # Panics
/// Panics if `hour` or `minute` is out of range.
#[must_use]
#[allow(clippy::expect_used)]
pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid test time")
}

/// Creates a test user with the given email and optional Telegram chat id.
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    tg_chat_id: Option<&str>,
) -> Result<entities::user::Model> {
    user::create_user(db, email.to_string(), None, tg_chat_id.map(str::to_string)).await
}

/// Habit input with sensible defaults.
///
/// # Defaults
/// * `place`: "Test place"
/// * `reward`: "Test reward"
/// * `time_to_complete`: 60
/// * not enjoyable, not public, no related habit, no periodicity (daily)
#[must_use]
pub fn test_habit_input(action: &str, habit_time: NaiveTime) -> NewHabit {
    NewHabit {
        place: "Test place".to_string(),
        habit_time,
        action: action.to_string(),
        enjoyable: false,
        related_habit_id: None,
        periodicity_id: None,
        reward: Some("Test reward".to_string()),
        time_to_complete: 60,
        publicity: false,
    }
}

/// Creates an enjoyable habit that other habits can link to.
pub async fn create_enjoyable_habit(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<entities::habit::Model> {
    let mut input = test_habit_input("Take a bath", at(21, 0));
    input.enjoyable = true;
    input.reward = None;
    habit::create_habit(db, user_id, input).await
}

/// Notifier that records every attempt and fails for selected addresses.
#[derive(Default)]
pub struct RecordingNotifier {
    failing: Vec<String>,
    attempts: Mutex<usize>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// A notifier that fails for each address in `addresses`.
    #[must_use]
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            failing: addresses.iter().map(|a| (*a).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Successfully delivered `(address, text)` pairs, in order.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of delivery attempts, failed ones included.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    #[allow(clippy::unwrap_used)]
    async fn notify(&self, address: &str, text: &str) -> Option<serde_json::Value> {
        *self.attempts.lock().unwrap() += 1;
        if self.failing.iter().any(|a| a == address) {
            return None;
        }
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), text.to_string()));
        Some(serde_json::json!({ "ok": true }))
    }
}
