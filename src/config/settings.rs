//! Application settings loading from config.toml
//!
//! The file lists the periodicities to seed on startup and tunes the reminder
//! scheduler. Every section is optional; a missing file means all defaults.

use crate::{
    entities::PeriodUnit,
    errors::{Error, Result},
};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Periodicities created on startup if missing
    #[serde(default)]
    pub periodicities: Vec<PeriodicityConfig>,
    /// Reminder scheduler settings
    #[serde(default)]
    pub reminder: ReminderConfig,
}

/// A periodicity to seed
#[derive(Debug, Deserialize, Clone)]
pub struct PeriodicityConfig {
    /// Number of units between occurrences
    pub value: i32,
    /// Unit of `value`
    pub unit: PeriodUnit,
}

/// Reminder scheduler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Seconds between scans
    pub interval_secs: u64,
    /// Offset from UTC in which habit times are interpreted
    pub utc_offset_minutes: i32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            utc_offset_minutes: 0,
        }
    }
}

impl ReminderConfig {
    /// The configured offset as a `chrono` timezone.
    ///
    /// # Errors
    /// Returns an error if the offset is a day or more away from UTC.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config {
                message: format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ),
            })
    }
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A periodicity unit is unknown
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `HABIT_BUDDY_CONFIG`, or ./config.toml when unset.
///
/// A missing file is not an error: defaults are used and a warning is logged.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("HABIT_BUDDY_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        warn!("Config file {path} not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config(path)
}
