//! User business logic - registration and contact details.
//!
//! Authentication is handled outside this crate; a user here is just an email
//! identity with optional phone and Telegram chat id.

use crate::{
    entities::{Habit, User, habit, user},
    errors::{Error, Result},
};
use sea_orm::{QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_valid_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
}

/// Finds a user by its unique ID.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email address.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new user.
///
/// The email is trimmed and must look like `local@domain`. Blank phone and chat id
/// values are stored as absent.
///
/// # Errors
/// Returns an error if:
/// - The email is malformed
/// - A user with this email already exists
/// - The database insert fails
pub async fn create_user(
    db: &DatabaseConnection,
    email: String,
    phone: Option<String>,
    tg_chat_id: Option<String>,
) -> Result<user::Model> {
    let email = email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(Error::InvalidEmail { email });
    }

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::UserAlreadyExists { email });
    }

    let user = user::ActiveModel {
        email: Set(email),
        phone: Set(normalize_optional(phone)),
        tg_chat_id: Set(normalize_optional(tg_chat_id)),
        ..Default::default()
    };
    let created = user.insert(db).await?;
    info!("Registered user {} ({})", created.id, created.email);
    Ok(created)
}

/// Replaces the phone number and Telegram chat id of a user.
///
/// Passing `None` (or a blank string) clears the field; a user without a chat id
/// stops receiving reminders.
pub async fn update_user_contact(
    db: &DatabaseConnection,
    user_id: i64,
    phone: Option<String>,
    tg_chat_id: Option<String>,
) -> Result<user::Model> {
    let existing = get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active: user::ActiveModel = existing.into();
    active.phone = Set(normalize_optional(phone));
    active.tg_chat_id = Set(normalize_optional(tg_chat_id));
    active.update(db).await.map_err(Into::into)
}

/// Deletes a user together with all of their habits.
///
/// Habits of other users that linked to one of the deleted habits keep existing
/// with the link cleared.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    get_user_by_id(&txn, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let owned_ids: Vec<i64> = Habit::find()
        .select_only()
        .column(habit::Column::Id)
        .filter(habit::Column::CreatorId.eq(user_id))
        .into_tuple()
        .all(&txn)
        .await?;

    if !owned_ids.is_empty() {
        Habit::update_many()
            .col_expr(
                habit::Column::RelatedHabitId,
                Expr::value(Option::<i64>::None),
            )
            .filter(habit::Column::RelatedHabitId.is_in(owned_ids.clone()))
            .exec(&txn)
            .await?;

        Habit::delete_many()
            .filter(habit::Column::Id.is_in(owned_ids))
            .exec(&txn)
            .await?;
    }

    User::delete_by_id(user_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted user {user_id}");
    Ok(())
}
