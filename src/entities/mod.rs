//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod habit;
pub mod periodicity;
pub mod user;

// Re-export specific types to avoid conflicts
pub use habit::{Column as HabitColumn, Entity as Habit, Model as HabitModel};
pub use periodicity::{
    Column as PeriodicityColumn, Entity as Periodicity, Model as PeriodicityModel, PeriodUnit,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
