//! Reminder scanning - finds habits due "now" and hands them to a notifier.
//!
//! The scan is a single sequential pass: habits whose time of day falls in the
//! current minute (seconds are ignored) are loaded together with their creator,
//! and one message is sent per habit whose creator has a Telegram chat id.
//! Delivery failures are swallowed by the notifier, so one dead chat never stops
//! the rest of the scan. There is no catch-up: a minute the scheduler never
//! visits is simply skipped.

use crate::{
    entities::{Habit, User, habit, user},
    errors::Result,
    notify::Notifier,
};
use chrono::{Duration, FixedOffset, NaiveTime, Timelike, Utc};
use sea_orm::{QueryOrder, prelude::*};
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one reminder scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Habits scheduled for the scanned minute
    pub due: usize,
    /// Messages the notifier accepted
    pub dispatched: usize,
    /// Due habits whose creator has no chat id
    pub skipped_no_address: usize,
    /// Messages the notifier failed to deliver
    pub failed: usize,
}

/// Builds the reminder text for a habit.
#[must_use]
pub fn compose_reminder_message(habit: &habit::Model) -> String {
    format!(
        "Habit reminder:\nI must {} at {}. Place: {}\nTime to complete: {} seconds",
        habit.action,
        habit.habit_time.format("%H:%M:%S"),
        habit.place,
        habit.time_to_complete
    )
}

/// Loads the habits scheduled for the same hour and minute as `now`, with their creators.
pub async fn find_due_habits<C>(
    db: &C,
    now: NaiveTime,
) -> Result<Vec<(habit::Model, Option<user::Model>)>>
where
    C: ConnectionTrait,
{
    let minute_start = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let (next_minute, wrapped) = minute_start.overflowing_add_signed(Duration::minutes(1));

    let mut query = Habit::find().filter(habit::Column::HabitTime.gte(minute_start));
    // 23:59 has no upper bound within the same day
    if wrapped == 0 {
        query = query.filter(habit::Column::HabitTime.lt(next_minute));
    }

    query
        .find_also_related(User)
        .order_by_asc(habit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sends one reminder per due habit whose creator has a chat id.
///
/// Only database errors are returned; notification failures are counted in the
/// summary and the scan moves on to the next habit.
pub async fn run_reminder_scan<C, N>(db: &C, notifier: &N, now: NaiveTime) -> Result<ScanSummary>
where
    C: ConnectionTrait,
    N: Notifier + ?Sized,
{
    let due = find_due_habits(db, now).await?;
    let mut summary = ScanSummary {
        due: due.len(),
        ..ScanSummary::default()
    };

    for (habit, creator) in due {
        let chat_id = creator
            .as_ref()
            .and_then(|user| user.tg_chat_id.as_deref())
            .map(str::trim)
            .filter(|chat_id| !chat_id.is_empty());

        let Some(chat_id) = chat_id else {
            debug!("Habit {} has no delivery address, skipping", habit.id);
            summary.skipped_no_address += 1;
            continue;
        };

        let message = compose_reminder_message(&habit);
        if notifier.notify(chat_id, &message).await.is_some() {
            summary.dispatched += 1;
        } else {
            warn!("Reminder for habit {} was not delivered", habit.id);
            summary.failed += 1;
        }
    }

    Ok(summary)
}

/// The periodic reminder job handed to the scheduler.
///
/// Holds everything a scan needs so the scheduler can call
/// [`ReminderJob::check_habits_and_send_reminders`] without arguments.
pub struct ReminderJob<N> {
    database: DatabaseConnection,
    notifier: N,
    utc_offset: FixedOffset,
}

impl<N: Notifier> ReminderJob<N> {
    /// Creates a job that interprets habit times in `utc_offset`.
    #[must_use]
    pub const fn new(database: DatabaseConnection, notifier: N, utc_offset: FixedOffset) -> Self {
        Self {
            database,
            notifier,
            utc_offset,
        }
    }

    /// Current wall-clock time of day in the configured offset.
    #[must_use]
    pub fn current_time(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.utc_offset).time()
    }

    /// Runs one scan at the current time. Errors are logged, never returned.
    #[instrument(skip(self))]
    pub async fn check_habits_and_send_reminders(&self) {
        let now = self.current_time();
        match run_reminder_scan(&self.database, &self.notifier, now).await {
            Ok(summary) if summary.due > 0 => info!(
                "Reminder scan at {}: {} due, {} sent, {} without address, {} failed",
                now.format("%H:%M"),
                summary.due,
                summary.dispatched,
                summary.skipped_no_address,
                summary.failed
            ),
            Ok(_) => debug!("Reminder scan at {}: nothing due", now.format("%H:%M")),
            Err(e) => error!("Reminder scan at {} failed: {}", now.format("%H:%M"), e),
        }
    }
}
