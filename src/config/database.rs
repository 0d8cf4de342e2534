//! Database configuration module for `HabitBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation uses `IF NOT EXISTS` because the
//! binary runs it on every start against a persistent database file.

use crate::entities::{Habit, Periodicity, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://habit_buddy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the users, periodicities, and habits tables if they do not exist yet.
///
/// Tables are created parents first so foreign keys always point at an existing table.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut periodicity_table = schema.create_table_from_entity(Periodicity);
    let mut habit_table = schema.create_table_from_entity(Habit);

    user_table.if_not_exists();
    periodicity_table.if_not_exists();
    habit_table.if_not_exists();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&periodicity_table)).await?;
    db.execute(builder.build(&habit_table)).await?;

    info!("Database tables ensured");
    Ok(())
}
