//! Habit entity - A user-owned recurring action.
//!
//! Each habit has a creator, a place, a time of day, an action, and a time budget
//! in seconds. A habit is either "useful" (optionally rewarded by a reward text or
//! by a linked enjoyable habit) or itself enjoyable, in which case it carries
//! neither. The invariants are enforced by `core::rules` before every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Unique identifier for the habit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who owns this habit
    pub creator_id: i64,
    /// Where the habit is performed
    pub place: String,
    /// Time of day the habit is scheduled for
    pub habit_time: Time,
    /// What the user does
    pub action: String,
    /// Whether this habit is a reward in itself
    pub enjoyable: bool,
    /// Linked enjoyable habit performed as a reward
    pub related_habit_id: Option<i64>,
    /// How often the habit recurs
    pub periodicity_id: Option<i64>,
    /// Reward text, exclusive with `related_habit_id`
    pub reward: Option<String>,
    /// Time budget in seconds (1-120)
    pub time_to_complete: i32,
    /// Whether other users may see this habit
    pub publicity: bool,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each habit belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
    /// Each habit optionally references one periodicity
    #[sea_orm(
        belongs_to = "super::periodicity::Entity",
        from = "Column::PeriodicityId",
        to = "super::periodicity::Column::Id",
        on_delete = "SetNull"
    )]
    Periodicity,
    /// Each habit optionally references an enjoyable habit
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::RelatedHabitId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    RelatedHabit,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::periodicity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periodicity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "I will {} at {} in {}",
            self.action,
            self.habit_time.format("%H:%M:%S"),
            self.place
        )
    }
}
