//! Habit and periodicity validation rules.
//!
//! This is the single rule set shared by every entry path: the input hook
//! (`core::habit::validate_new_habit`) and the pre-save checks inside
//! `create_habit` / `update_habit` / the periodicity operations all call into
//! here. Rules are pure predicates over a [`HabitCandidate`]; every violated rule
//! is reported, not just the first one.

use crate::entities::{PeriodUnit, habit};
use std::fmt;
use thiserror::Error;

/// Upper bound for `time_to_complete`, in seconds.
pub const MAX_TIME_TO_COMPLETE: i32 = 120;

/// Largest allowed value for a periodicity counted in days.
pub const MAX_DAYS: i32 = 7;

/// Largest allowed value for a periodicity counted in weeks.
pub const MAX_WEEKS: i32 = 1;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Reward text and related habit were both given
    #[error("a habit can have either a reward or a related habit, not both")]
    MutuallyExclusiveFields,

    /// Time to complete is above the limit
    #[error("time to complete must not exceed {max} seconds, got {seconds}", max = MAX_TIME_TO_COMPLETE)]
    DurationExceeded {
        /// Submitted value
        seconds: i32,
    },

    /// Time to complete is zero or negative
    #[error("time to complete must be at least 1 second, got {seconds}")]
    NonPositiveDuration {
        /// Submitted value
        seconds: i32,
    },

    /// The linked habit is not flagged as enjoyable
    #[error("a related habit must be an enjoyable habit")]
    RelatedHabitNotEnjoyable,

    /// An enjoyable habit was given a reward or a related habit
    #[error("an enjoyable habit cannot have a reward or a related habit")]
    EnjoyableHabitHasRewardOrRelation,

    /// Recurrence interval is not positive or is longer than a week
    #[error("invalid periodicity '{value} {unit}': habits must recur at least once a week")]
    InvalidPeriodicity {
        /// Submitted value
        value: i32,
        /// Submitted unit
        unit: PeriodUnit,
    },

    /// A required text field is empty
    #[error("field '{field}' cannot be blank")]
    BlankField {
        /// Name of the offending field
        field: &'static str,
    },
}

/// Every rule a candidate broke, in rule order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// The individual violations.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether `error` is among the violations.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// Human-readable messages, one per violation, for structured API responses.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `Ok` when `errors` is empty, otherwise all of them as one error.
    pub(crate) fn check(errors: Vec<ValidationError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The fields of a habit the rules look at, with references already resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct HabitCandidate<'a> {
    /// What the user does
    pub action: &'a str,
    /// Where the habit is performed
    pub place: &'a str,
    /// Reward text; blank counts as absent
    pub reward: Option<&'a str>,
    /// The linked habit, loaded from storage
    pub related_habit: Option<&'a habit::Model>,
    /// Whether the candidate is itself enjoyable
    pub enjoyable: bool,
    /// Time budget in seconds
    pub time_to_complete: i32,
    /// Recurrence as (value, unit), if any
    pub periodicity: Option<(i32, PeriodUnit)>,
}

impl HabitCandidate<'_> {
    fn has_reward(&self) -> bool {
        self.reward.is_some_and(|reward| !reward.trim().is_empty())
    }
}

/// Checks a recurrence interval.
///
/// Days are capped at 7 and weeks at 1; minutes and hours have no upper bound.
/// The value must be positive for every unit.
pub const fn validate_periodicity(value: i32, unit: PeriodUnit) -> Result<(), ValidationError> {
    let too_long = match unit {
        PeriodUnit::Days => value > MAX_DAYS,
        PeriodUnit::Weeks => value > MAX_WEEKS,
        PeriodUnit::Minutes | PeriodUnit::Hours => false,
    };

    if value < 1 || too_long {
        Err(ValidationError::InvalidPeriodicity { value, unit })
    } else {
        Ok(())
    }
}

/// Runs every habit rule against `candidate` and collects all violations.
pub fn validate_habit(candidate: &HabitCandidate<'_>) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    let has_reward = candidate.has_reward();
    let has_related = candidate.related_habit.is_some();

    if candidate.action.trim().is_empty() {
        errors.push(ValidationError::BlankField { field: "action" });
    }
    if candidate.place.trim().is_empty() {
        errors.push(ValidationError::BlankField { field: "place" });
    }

    if has_reward && has_related {
        errors.push(ValidationError::MutuallyExclusiveFields);
    }

    if candidate.time_to_complete > MAX_TIME_TO_COMPLETE {
        errors.push(ValidationError::DurationExceeded {
            seconds: candidate.time_to_complete,
        });
    } else if candidate.time_to_complete < 1 {
        errors.push(ValidationError::NonPositiveDuration {
            seconds: candidate.time_to_complete,
        });
    }

    if candidate.related_habit.is_some_and(|related| !related.enjoyable) {
        errors.push(ValidationError::RelatedHabitNotEnjoyable);
    }

    if candidate.enjoyable && (has_reward || has_related) {
        errors.push(ValidationError::EnjoyableHabitHasRewardOrRelation);
    }

    if let Some(Err(error)) = candidate
        .periodicity
        .map(|(value, unit)| validate_periodicity(value, unit))
    {
        errors.push(error);
    }

    ValidationErrors::check(errors)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::NaiveTime;

    fn stored_habit(enjoyable: bool) -> habit::Model {
        habit::Model {
            id: 1,
            creator_id: 1,
            place: "Park".to_string(),
            habit_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            action: "Eat an ice cream".to_string(),
            enjoyable,
            related_habit_id: None,
            periodicity_id: None,
            reward: None,
            time_to_complete: 60,
            publicity: false,
        }
    }

    fn candidate() -> HabitCandidate<'static> {
        HabitCandidate {
            action: "Walk",
            place: "Park",
            time_to_complete: 60,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_habit_is_valid() {
        assert!(validate_habit(&candidate()).is_ok());
    }

    #[test]
    fn test_reward_and_related_are_exclusive() {
        let related = stored_habit(true);
        let habit = HabitCandidate {
            reward: Some("Dessert"),
            related_habit: Some(&related),
            ..candidate()
        };

        let errors = validate_habit(&habit).unwrap_err();
        assert_eq!(errors.errors(), [ValidationError::MutuallyExclusiveFields]);
    }

    #[test]
    fn test_blank_reward_counts_as_absent() {
        let related = stored_habit(true);
        let habit = HabitCandidate {
            reward: Some("   "),
            related_habit: Some(&related),
            ..candidate()
        };

        assert!(validate_habit(&habit).is_ok());
    }

    #[test]
    fn test_time_to_complete_bounds() {
        for seconds in [1, 60, 120] {
            let habit = HabitCandidate {
                time_to_complete: seconds,
                ..candidate()
            };
            assert!(validate_habit(&habit).is_ok(), "{seconds} should pass");
        }

        let too_long = HabitCandidate {
            time_to_complete: 121,
            ..candidate()
        };
        assert!(
            validate_habit(&too_long)
                .unwrap_err()
                .contains(&ValidationError::DurationExceeded { seconds: 121 })
        );

        let negative = HabitCandidate {
            time_to_complete: -5,
            ..candidate()
        };
        assert!(
            validate_habit(&negative)
                .unwrap_err()
                .contains(&ValidationError::NonPositiveDuration { seconds: -5 })
        );
    }

    #[test]
    fn test_related_habit_must_be_enjoyable() {
        let related = stored_habit(false);
        let habit = HabitCandidate {
            related_habit: Some(&related),
            ..candidate()
        };

        let errors = validate_habit(&habit).unwrap_err();
        assert_eq!(errors.errors(), [ValidationError::RelatedHabitNotEnjoyable]);

        let enjoyable = stored_habit(true);
        let habit = HabitCandidate {
            related_habit: Some(&enjoyable),
            ..candidate()
        };
        assert!(validate_habit(&habit).is_ok());
    }

    #[test]
    fn test_enjoyable_habit_has_no_reward_or_relation() {
        let with_reward = HabitCandidate {
            enjoyable: true,
            reward: Some("Dessert"),
            ..candidate()
        };
        assert_eq!(
            validate_habit(&with_reward).unwrap_err().errors(),
            [ValidationError::EnjoyableHabitHasRewardOrRelation]
        );

        let related = stored_habit(true);
        let with_related = HabitCandidate {
            enjoyable: true,
            related_habit: Some(&related),
            ..candidate()
        };
        assert_eq!(
            validate_habit(&with_related).unwrap_err().errors(),
            [ValidationError::EnjoyableHabitHasRewardOrRelation]
        );

        let bare = HabitCandidate {
            enjoyable: true,
            ..candidate()
        };
        assert!(validate_habit(&bare).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let related = stored_habit(false);
        let habit = HabitCandidate {
            action: "",
            enjoyable: true,
            reward: Some("Dessert"),
            related_habit: Some(&related),
            time_to_complete: 121,
            periodicity: Some((8, PeriodUnit::Days)),
            ..candidate()
        };

        let errors = validate_habit(&habit).unwrap_err();
        assert_eq!(
            errors.errors(),
            [
                ValidationError::BlankField { field: "action" },
                ValidationError::MutuallyExclusiveFields,
                ValidationError::DurationExceeded { seconds: 121 },
                ValidationError::RelatedHabitNotEnjoyable,
                ValidationError::EnjoyableHabitHasRewardOrRelation,
                ValidationError::InvalidPeriodicity {
                    value: 8,
                    unit: PeriodUnit::Days
                },
            ]
        );
        assert_eq!(errors.messages().len(), 6);
    }

    #[test]
    fn test_periodicity_limits() {
        assert!(validate_periodicity(7, PeriodUnit::Days).is_ok());
        assert!(validate_periodicity(8, PeriodUnit::Days).is_err());
        assert!(validate_periodicity(1, PeriodUnit::Weeks).is_ok());
        assert!(validate_periodicity(2, PeriodUnit::Weeks).is_err());
        assert!(validate_periodicity(1000, PeriodUnit::Minutes).is_ok());
        assert!(validate_periodicity(48, PeriodUnit::Hours).is_ok());
        assert_eq!(
            validate_periodicity(0, PeriodUnit::Hours),
            Err(ValidationError::InvalidPeriodicity {
                value: 0,
                unit: PeriodUnit::Hours
            })
        );
    }

    #[test]
    fn test_habit_periodicity_is_checked() {
        let habit = HabitCandidate {
            periodicity: Some((2, PeriodUnit::Weeks)),
            ..candidate()
        };
        assert_eq!(
            validate_habit(&habit).unwrap_err().errors(),
            [ValidationError::InvalidPeriodicity {
                value: 2,
                unit: PeriodUnit::Weeks
            }]
        );
    }

    #[test]
    fn test_error_messages_are_joined() {
        let habit = HabitCandidate {
            enjoyable: true,
            reward: Some("Dessert"),
            time_to_complete: 200,
            ..candidate()
        };
        let message = validate_habit(&habit).unwrap_err().to_string();
        assert!(message.contains("120 seconds"));
        assert!(message.contains("; "));
    }
}
