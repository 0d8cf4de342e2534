//! User entity - Owner of habits and recipient of reminders.
//!
//! Users are identified by their email address. The optional Telegram chat id
//! is the delivery address used by the reminder scanner; users without one
//! never receive reminders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Email address, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Telegram chat id used as the reminder delivery address
    pub tg_chat_id: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user creates many habits
    #[sea_orm(has_many = "super::habit::Entity")]
    Habits,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}
