//! Habit business logic - Handles all habit-related operations.
//!
//! Habits are only ever read, changed, or deleted by their creator; a habit owned by
//! someone else behaves exactly like a missing one. Every create and update runs the
//! shared rules from [`crate::core::rules`] against the fully resolved record, so the
//! invariants hold no matter which caller saved it.

use crate::{
    core::{
        periodicity::{get_or_create_daily_periodicity, get_periodicity_by_id},
        rules::{self, HabitCandidate, ValidationError, ValidationErrors},
        user::get_user_by_id,
    },
    entities::{Habit, habit},
    errors::{Error, Result},
};
use chrono::NaiveTime;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

/// Data submitted to create a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    /// Where the habit is performed
    pub place: String,
    /// Time of day, `HH:MM:SS`
    pub habit_time: NaiveTime,
    /// What the user does
    pub action: String,
    /// Whether this habit is a reward in itself
    #[serde(default)]
    pub enjoyable: bool,
    /// Linked enjoyable habit
    #[serde(default)]
    pub related_habit_id: Option<i64>,
    /// Periodicity; the daily periodicity is used when absent
    #[serde(default)]
    pub periodicity_id: Option<i64>,
    /// Reward text
    #[serde(default)]
    pub reward: Option<String>,
    /// Time budget in seconds
    pub time_to_complete: i32,
    /// Whether other users may see this habit
    #[serde(default)]
    pub publicity: bool,
}

/// Partial update of a habit. Absent fields keep their stored value.
///
/// For the nullable links and the reward, `Some(None)` (an explicit JSON `null`)
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HabitPatch {
    /// New place
    #[serde(default)]
    pub place: Option<String>,
    /// New time of day
    #[serde(default)]
    pub habit_time: Option<NaiveTime>,
    /// New action
    #[serde(default)]
    pub action: Option<String>,
    /// New enjoyable flag
    #[serde(default)]
    pub enjoyable: Option<bool>,
    /// New related habit, or `Some(None)` to unlink
    #[serde(default, deserialize_with = "double_option")]
    pub related_habit_id: Option<Option<i64>>,
    /// New periodicity, or `Some(None)` to clear
    #[serde(default, deserialize_with = "double_option")]
    pub periodicity_id: Option<Option<i64>>,
    /// New reward, or `Some(None)` to clear
    #[serde(default, deserialize_with = "double_option")]
    pub reward: Option<Option<String>>,
    /// New time budget
    #[serde(default)]
    pub time_to_complete: Option<i32>,
    /// New publicity flag
    #[serde(default)]
    pub publicity: Option<bool>,
}

fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn normalize_reward(reward: Option<String>) -> Option<String> {
    reward
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

/// Field values the rules need, before references are resolved.
struct RuleFields<'a> {
    action: &'a str,
    place: &'a str,
    reward: Option<&'a str>,
    related_habit_id: Option<i64>,
    enjoyable: bool,
    time_to_complete: i32,
    periodicity_id: Option<i64>,
}

/// Loads the referenced habit and periodicity, then runs the shared rules.
async fn check_rules<C>(db: &C, fields: &RuleFields<'_>) -> Result<()>
where
    C: ConnectionTrait,
{
    let related_habit = match fields.related_habit_id {
        Some(id) => Some(
            Habit::find_by_id(id)
                .one(db)
                .await?
                .ok_or(Error::HabitNotFound { id })?,
        ),
        None => None,
    };

    let periodicity = match fields.periodicity_id {
        Some(id) => Some(
            get_periodicity_by_id(db, id)
                .await?
                .ok_or(Error::PeriodicityNotFound { id })?,
        ),
        None => None,
    };

    let candidate = HabitCandidate {
        action: fields.action,
        place: fields.place,
        reward: fields.reward,
        related_habit: related_habit.as_ref(),
        enjoyable: fields.enjoyable,
        time_to_complete: fields.time_to_complete,
        periodicity: periodicity.as_ref().map(|p| (p.value, p.unit)),
    };

    rules::validate_habit(&candidate).map_err(Into::into)
}

/// Validates submitted habit data without saving it.
///
/// This is the input hook for API layers: it resolves the linked habit and
/// periodicity and reports every broken rule at once.
///
/// # Errors
/// Returns [`Error::Validation`] listing all violations, or a not-found error if a
/// referenced habit or periodicity does not exist.
pub async fn validate_new_habit<C>(db: &C, input: &NewHabit) -> Result<()>
where
    C: ConnectionTrait,
{
    check_rules(
        db,
        &RuleFields {
            action: &input.action,
            place: &input.place,
            reward: input.reward.as_deref(),
            related_habit_id: input.related_habit_id,
            enjoyable: input.enjoyable,
            time_to_complete: input.time_to_complete,
            periodicity_id: input.periodicity_id,
        },
    )
    .await
}

/// Creates a habit owned by `creator_id`.
///
/// Text fields are trimmed, a blank reward is stored as absent, and a missing
/// periodicity defaults to daily.
///
/// # Errors
/// Returns an error if the creator does not exist, the data breaks a rule, or the
/// database insert fails.
pub async fn create_habit(
    db: &DatabaseConnection,
    creator_id: i64,
    input: NewHabit,
) -> Result<habit::Model> {
    get_user_by_id(db, creator_id)
        .await?
        .ok_or(Error::UserNotFound { id: creator_id })?;

    validate_new_habit(db, &input).await?;

    let periodicity_id = match input.periodicity_id {
        Some(id) => id,
        None => get_or_create_daily_periodicity(db).await?.id,
    };

    let habit = habit::ActiveModel {
        creator_id: Set(creator_id),
        place: Set(input.place.trim().to_string()),
        habit_time: Set(input.habit_time),
        action: Set(input.action.trim().to_string()),
        enjoyable: Set(input.enjoyable),
        related_habit_id: Set(input.related_habit_id),
        periodicity_id: Set(Some(periodicity_id)),
        reward: Set(normalize_reward(input.reward)),
        time_to_complete: Set(input.time_to_complete),
        publicity: Set(input.publicity),
        ..Default::default()
    };

    let created = habit.insert(db).await?;
    info!("User {creator_id} created habit {}: {created}", created.id);
    Ok(created)
}

/// Finds a habit by ID, but only if `user_id` owns it.
pub async fn get_habit_for_user<C>(
    db: &C,
    user_id: i64,
    habit_id: i64,
) -> Result<Option<habit::Model>>
where
    C: ConnectionTrait,
{
    Habit::find_by_id(habit_id)
        .filter(habit::Column::CreatorId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the habits owned by `user_id`, oldest first.
pub async fn list_habits_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::CreatorId.eq(user_id))
        .order_by_asc(habit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every habit flagged as public, regardless of owner.
pub async fn list_public_habits(db: &DatabaseConnection) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::Publicity.eq(true))
        .order_by_asc(habit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a habit owned by `user_id`.
///
/// The patch is merged into the stored record and the merged record is validated,
/// so a patch that only sets a reward on a habit that already links another habit
/// is rejected. Turning an enjoyable habit into a regular one is refused while other
/// habits still link to it.
///
/// # Errors
/// Returns [`Error::HabitNotFound`] if the habit does not exist or is owned by someone
/// else, [`Error::Validation`] if the merged record breaks a rule, or a database error.
pub async fn update_habit(
    db: &DatabaseConnection,
    user_id: i64,
    habit_id: i64,
    patch: HabitPatch,
) -> Result<habit::Model> {
    let existing = get_habit_for_user(db, user_id, habit_id)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;

    let place = patch.place.unwrap_or_else(|| existing.place.clone());
    let action = patch.action.unwrap_or_else(|| existing.action.clone());
    let habit_time = patch.habit_time.unwrap_or(existing.habit_time);
    let enjoyable = patch.enjoyable.unwrap_or(existing.enjoyable);
    let related_habit_id = patch.related_habit_id.unwrap_or(existing.related_habit_id);
    let periodicity_id = patch.periodicity_id.unwrap_or(existing.periodicity_id);
    let reward = normalize_reward(patch.reward.unwrap_or_else(|| existing.reward.clone()));
    let time_to_complete = patch.time_to_complete.unwrap_or(existing.time_to_complete);
    let publicity = patch.publicity.unwrap_or(existing.publicity);

    let rules_result = check_rules(
        db,
        &RuleFields {
            action: &action,
            place: &place,
            reward: reward.as_deref(),
            related_habit_id,
            enjoyable,
            time_to_complete,
            periodicity_id,
        },
    )
    .await;

    let mut violations = match rules_result {
        Ok(()) => Vec::new(),
        Err(Error::Validation(errors)) => errors.errors().to_vec(),
        Err(other) => return Err(other),
    };

    // A self-link is judged by the merged record; the stored copy is stale.
    if related_habit_id == Some(habit_id)
        && !enjoyable
        && !violations.contains(&ValidationError::RelatedHabitNotEnjoyable)
    {
        violations.push(ValidationError::RelatedHabitNotEnjoyable);
    }

    if existing.enjoyable && !enjoyable {
        let dependents = Habit::find()
            .filter(habit::Column::RelatedHabitId.eq(habit_id))
            .filter(habit::Column::Id.ne(habit_id))
            .count(db)
            .await?;
        if dependents > 0 && !violations.contains(&ValidationError::RelatedHabitNotEnjoyable) {
            debug!("Habit {habit_id} is linked by {dependents} habit(s)");
            violations.push(ValidationError::RelatedHabitNotEnjoyable);
        }
    }

    ValidationErrors::check(violations)?;

    let mut active: habit::ActiveModel = existing.into();
    active.place = Set(place.trim().to_string());
    active.action = Set(action.trim().to_string());
    active.habit_time = Set(habit_time);
    active.enjoyable = Set(enjoyable);
    active.related_habit_id = Set(related_habit_id);
    active.periodicity_id = Set(periodicity_id);
    active.reward = Set(reward);
    active.time_to_complete = Set(time_to_complete);
    active.publicity = Set(publicity);

    let updated = active.update(db).await?;
    info!("User {user_id} updated habit {habit_id}");
    Ok(updated)
}

/// Deletes a habit owned by `user_id`.
///
/// Habits that linked to it keep existing with the link cleared.
pub async fn delete_habit(db: &DatabaseConnection, user_id: i64, habit_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_habit_for_user(&txn, user_id, habit_id)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;

    Habit::update_many()
        .col_expr(
            habit::Column::RelatedHabitId,
            Expr::value(Option::<i64>::None),
        )
        .filter(habit::Column::RelatedHabitId.eq(habit_id))
        .exec(&txn)
        .await?;

    Habit::delete_by_id(habit_id).exec(&txn).await?;
    txn.commit().await?;

    info!("User {user_id} deleted habit {habit_id}");
    Ok(())
}
