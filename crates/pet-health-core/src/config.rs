//! Tunables for scoring and derived views.
//!
//! Loadable from JSON or from `PET_HEALTH_*` environment variables; anything
//! unset keeps its default.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::CategoryThresholds;

pub const ENV_FRESHNESS_HOURS: &str = "PET_HEALTH_SCORE_FRESHNESS_HOURS";
pub const ENV_DUE_SOON_DAYS: &str = "PET_HEALTH_DUE_SOON_DAYS";
pub const ENV_UPCOMING_DAYS: &str = "PET_HEALTH_UPCOMING_DAYS";

/// Longest accepted freshness window (one year).
pub const MAX_FRESHNESS_HOURS: i64 = 24 * 365;
/// Longest accepted day horizon (ten years).
pub const MAX_HORIZON_DAYS: i64 = 3650;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Health score and calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// A score row younger than this is reused instead of recalculated
    pub score_freshness_hours: i64,
    /// Vaccinations due within this many days count as "due soon"
    pub due_soon_days: i64,
    /// Horizon for the upcoming-events calendar
    pub upcoming_horizon_days: i64,
    /// Category lower bounds
    pub thresholds: CategoryThresholds,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            score_freshness_hours: 24,
            due_soon_days: 30,
            upcoming_horizon_days: 60,
            thresholds: CategoryThresholds::default(),
        }
    }
}

impl HealthConfig {
    /// Parse from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = parse_var(&lookup, ENV_FRESHNESS_HOURS)? {
            config.score_freshness_hours = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_DUE_SOON_DAYS)? {
            config.due_soon_days = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_UPCOMING_DAYS)? {
            config.upcoming_horizon_days = value;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_FRESHNESS_HOURS).contains(&self.score_freshness_hours) {
            return Err(ConfigError::Invalid(format!(
                "score_freshness_hours must be within 0..={MAX_FRESHNESS_HOURS}"
            )));
        }
        for (key, days) in [
            ("due_soon_days", self.due_soon_days),
            ("upcoming_horizon_days", self.upcoming_horizon_days),
        ] {
            if !(0..=MAX_HORIZON_DAYS).contains(&days) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be within 0..={MAX_HORIZON_DAYS}"
                )));
            }
        }
        self.thresholds.validate().map_err(ConfigError::Invalid)
    }

    /// Freshness window as a duration, clamped to `0..=MAX_FRESHNESS_HOURS`
    /// for configs built without [`validate`](Self::validate).
    pub fn freshness_window(&self) -> Duration {
        Duration::hours(self.score_freshness_hours.clamp(0, MAX_FRESHNESS_HOURS))
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<i64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}
