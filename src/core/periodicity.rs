//! Periodicity business logic - recurrence intervals and their textual form.
//!
//! Periodicities are shared records referenced by habits. Every write goes through
//! [`rules::validate_periodicity`], so a stored periodicity never exceeds one week.
//! Rendering picks the unit word by the Slavic plural bucket of the value, which is
//! what the Russian phrasing needs; the English word table simply maps every bucket
//! to the plural.

use crate::{
    config::settings::PeriodicityConfig,
    core::rules::{self, ValidationErrors},
    entities::{Habit, PeriodUnit, Periodicity, habit, periodicity},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::fmt;
use tracing::{debug, info};

/// Plural bucket of a count, following the Slavic three-form rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralForm {
    /// Ends in 1 but not 11 (1, 21, 101)
    One,
    /// Ends in 2-4 but not 12-14 (2, 23, 104)
    Few,
    /// Everything else (0, 5-20, 25, 111)
    Many,
}

impl PluralForm {
    /// Picks the bucket from the last two digits of `count`.
    #[must_use]
    pub const fn for_count(count: u32) -> Self {
        let last_two = count % 100;
        let last = count % 10;
        if last_two >= 11 && last_two <= 14 {
            Self::Many
        } else if last == 1 {
            Self::One
        } else if last >= 2 && last <= 4 {
            Self::Few
        } else {
            Self::Many
        }
    }
}

/// Language of the rendered phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// "Daily", "Every 3 hours"
    #[default]
    English,
    /// "Ежедневно", "Каждые 3 часа"
    Russian,
}

struct UnitWords {
    single: &'static str,
    one: &'static str,
    few: &'static str,
    many: &'static str,
}

impl UnitWords {
    const fn pick(&self, form: PluralForm) -> &'static str {
        match form {
            PluralForm::One => self.one,
            PluralForm::Few => self.few,
            PluralForm::Many => self.many,
        }
    }
}

const fn unit_words(unit: PeriodUnit, language: Language) -> UnitWords {
    match (language, unit) {
        (Language::English, PeriodUnit::Minutes) => UnitWords {
            single: "Every minute",
            one: "minutes",
            few: "minutes",
            many: "minutes",
        },
        (Language::English, PeriodUnit::Hours) => UnitWords {
            single: "Hourly",
            one: "hours",
            few: "hours",
            many: "hours",
        },
        (Language::English, PeriodUnit::Days) => UnitWords {
            single: "Daily",
            one: "days",
            few: "days",
            many: "days",
        },
        (Language::English, PeriodUnit::Weeks) => UnitWords {
            single: "Weekly",
            one: "weeks",
            few: "weeks",
            many: "weeks",
        },
        (Language::Russian, PeriodUnit::Minutes) => UnitWords {
            single: "Ежеминутно",
            one: "минуту",
            few: "минуты",
            many: "минут",
        },
        (Language::Russian, PeriodUnit::Hours) => UnitWords {
            single: "Ежечасно",
            one: "час",
            few: "часа",
            many: "часов",
        },
        (Language::Russian, PeriodUnit::Days) => UnitWords {
            single: "Ежедневно",
            one: "день",
            few: "дня",
            many: "дней",
        },
        (Language::Russian, PeriodUnit::Weeks) => UnitWords {
            single: "Еженедельно",
            one: "неделю",
            few: "недели",
            many: "недель",
        },
    }
}

/// Renders a recurrence interval as a phrase such as "Daily" or "Every 3 hours".
#[must_use]
pub fn describe(value: u32, unit: PeriodUnit, language: Language) -> String {
    let words = unit_words(unit, language);
    if value == 1 {
        return words.single.to_string();
    }

    let word = words.pick(PluralForm::for_count(value));
    match language {
        Language::English => format!("Every {value} {word}"),
        Language::Russian => format!("Каждые {value} {word}"),
    }
}

impl periodicity::Model {
    /// Renders this periodicity in `language`.
    #[must_use]
    pub fn describe(&self, language: Language) -> String {
        describe(self.value.unsigned_abs(), self.unit, language)
    }
}

impl fmt::Display for periodicity::Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(Language::English))
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        })
    }
}

/// Finds a periodicity by its unique ID.
pub async fn get_periodicity_by_id<C>(
    db: &C,
    periodicity_id: i64,
) -> Result<Option<periodicity::Model>>
where
    C: ConnectionTrait,
{
    Periodicity::find_by_id(periodicity_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a periodicity with exactly this value and unit.
pub async fn find_periodicity<C>(
    db: &C,
    value: i32,
    unit: PeriodUnit,
) -> Result<Option<periodicity::Model>>
where
    C: ConnectionTrait,
{
    Periodicity::find()
        .filter(periodicity::Column::Value.eq(value))
        .filter(periodicity::Column::Unit.eq(unit))
        .order_by_asc(periodicity::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all periodicities in creation order.
pub async fn list_periodicities(db: &DatabaseConnection) -> Result<Vec<periodicity::Model>> {
    Periodicity::find()
        .order_by_asc(periodicity::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a periodicity after checking the one-week limit.
///
/// # Errors
/// Returns a validation error for a non-positive value, more than 7 days or more
/// than 1 week, or an error if the database insert fails.
pub async fn create_periodicity<C>(
    db: &C,
    value: i32,
    unit: PeriodUnit,
) -> Result<periodicity::Model>
where
    C: ConnectionTrait,
{
    rules::validate_periodicity(value, unit).map_err(ValidationErrors::from)?;

    let periodicity = periodicity::ActiveModel {
        value: Set(value),
        unit: Set(unit),
        ..Default::default()
    };
    let created = periodicity.insert(db).await?;
    debug!("Created periodicity {} ({created})", created.id);
    Ok(created)
}

/// Changes the value and/or unit of a periodicity; omitted fields keep their value.
///
/// The merged pair is validated, so changing only the unit to weeks on a
/// periodicity of 3 is rejected.
pub async fn update_periodicity(
    db: &DatabaseConnection,
    periodicity_id: i64,
    value: Option<i32>,
    unit: Option<PeriodUnit>,
) -> Result<periodicity::Model> {
    let existing = get_periodicity_by_id(db, periodicity_id)
        .await?
        .ok_or(Error::PeriodicityNotFound { id: periodicity_id })?;

    let new_value = value.unwrap_or(existing.value);
    let new_unit = unit.unwrap_or(existing.unit);
    rules::validate_periodicity(new_value, new_unit).map_err(ValidationErrors::from)?;

    let mut active: periodicity::ActiveModel = existing.into();
    active.value = Set(new_value);
    active.unit = Set(new_unit);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a periodicity and detaches it from every habit that used it.
///
/// Habits are kept; their periodicity becomes absent. Returns the number of
/// habits that were detached.
pub async fn delete_periodicity(db: &DatabaseConnection, periodicity_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let existing = get_periodicity_by_id(&txn, periodicity_id)
        .await?
        .ok_or(Error::PeriodicityNotFound { id: periodicity_id })?;

    let detached = Habit::update_many()
        .col_expr(
            habit::Column::PeriodicityId,
            Expr::value(Option::<i64>::None),
        )
        .filter(habit::Column::PeriodicityId.eq(periodicity_id))
        .exec(&txn)
        .await?
        .rows_affected;

    Periodicity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted periodicity {periodicity_id}, detached {detached} habit(s)");
    Ok(detached)
}

/// Returns the "daily" periodicity (1 day), creating it if it does not exist yet.
///
/// Habits created without a periodicity are assigned this one.
pub async fn get_or_create_daily_periodicity<C>(db: &C) -> Result<periodicity::Model>
where
    C: ConnectionTrait,
{
    match find_periodicity(db, 1, PeriodUnit::Days).await? {
        Some(daily) => Ok(daily),
        None => create_periodicity(db, 1, PeriodUnit::Days).await,
    }
}

/// Makes sure every configured periodicity exists, creating the missing ones.
///
/// Returns how many were created. Invalid entries abort seeding with a validation error.
pub async fn seed_periodicities(
    db: &DatabaseConnection,
    seeds: &[PeriodicityConfig],
) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if find_periodicity(db, seed.value, seed.unit).await?.is_none() {
            create_periodicity(db, seed.value, seed.unit).await?;
            created += 1;
        }
    }
    info!("Seeded {created} periodicities ({} configured)", seeds.len());
    Ok(created)
}
