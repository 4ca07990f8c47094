//! Health score rows and categories.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Ordered health buckets, best first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthCategory {
    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCategory::Excellent => "EXCELLENT",
            HealthCategory::Good => "GOOD",
            HealthCategory::Fair => "FAIR",
            HealthCategory::Poor => "POOR",
            HealthCategory::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score fields returned by the `calculate_health_score` procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawHealthScore {
    /// Weighted overall score (0-100)
    pub overall_score: f64,
    pub vaccination_score: f64,
    pub preventive_care_score: f64,
    pub weight_score: f64,
    pub condition_score: f64,
    /// Free-text recommendations produced by the calculation
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A persisted score row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthScoreRecord {
    pub id: String,
    pub pet_id: String,
    pub overall_score: f64,
    pub vaccination_score: f64,
    pub preventive_care_score: f64,
    pub weight_score: f64,
    pub condition_score: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl HealthScoreRecord {
    /// Build a row from a fresh calculation.
    pub fn from_raw(id: String, pet_id: &str, raw: RawHealthScore, calculated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            overall_score: raw.overall_score,
            vaccination_score: raw.vaccination_score,
            preventive_care_score: raw.preventive_care_score,
            weight_score: raw.weight_score,
            condition_score: raw.condition_score,
            recommendations: raw.recommendations,
            calculated_at,
        }
    }

    /// Whether the row is strictly younger than `window` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.calculated_at < window
    }
}
