//! Periodicity entity - How often a habit recurs.
//!
//! A periodicity is a (value, unit) pair such as "every 3 hours". Periodicities
//! are standalone records shared between habits; deleting one leaves the
//! referencing habits without a periodicity rather than deleting them.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Unit of a recurrence interval, stored as lowercase text.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    /// Minutes
    #[sea_orm(string_value = "minutes")]
    Minutes,
    /// Hours
    #[sea_orm(string_value = "hours")]
    Hours,
    /// Days (at most 7)
    #[sea_orm(string_value = "days")]
    Days,
    /// Weeks (at most 1)
    #[sea_orm(string_value = "weeks")]
    Weeks,
}

/// Periodicity database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "periodicities")]
pub struct Model {
    /// Unique identifier for the periodicity
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Number of units between repetitions, always positive
    pub value: i32,
    /// Unit the value is counted in
    pub unit: PeriodUnit,
}

/// Defines relationships between Periodicity and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One periodicity is shared by many habits
    #[sea_orm(has_many = "super::habit::Entity")]
    Habits,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
