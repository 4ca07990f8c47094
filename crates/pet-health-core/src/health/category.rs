//! Score-to-category thresholds.

use serde::{Deserialize, Serialize};

use crate::models::HealthCategory;

/// Lower bounds (inclusive) of each category above CRITICAL.
///
/// Default table: `[90,100]` EXCELLENT, `[75,90)` GOOD, `[60,75)` FAIR,
/// `[40,60)` POOR, `[0,40)` CRITICAL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 75.0,
            fair: 60.0,
            poor: 40.0,
        }
    }
}

impl CategoryThresholds {
    /// Map a raw score to its category.
    ///
    /// Scores above 100 are EXCELLENT; negative and NaN scores are CRITICAL.
    pub fn categorize(&self, score: f64) -> HealthCategory {
        if score.is_nan() {
            HealthCategory::Critical
        } else if score >= self.excellent {
            HealthCategory::Excellent
        } else if score >= self.good {
            HealthCategory::Good
        } else if score >= self.fair {
            HealthCategory::Fair
        } else if score >= self.poor {
            HealthCategory::Poor
        } else {
            HealthCategory::Critical
        }
    }

    /// Check the bounds are strictly descending and within 0-100.
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [self.excellent, self.good, self.fair, self.poor];
        if bounds.iter().any(|b| !(0.0..=100.0).contains(b)) {
            return Err(format!("thresholds must lie within 0-100: {:?}", bounds));
        }
        if bounds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(format!("thresholds must be strictly descending: {:?}", bounds));
        }
        Ok(())
    }
}

/// Categorize with the default threshold table.
pub fn categorize(score: f64) -> HealthCategory {
    CategoryThresholds::default().categorize(score)
}
