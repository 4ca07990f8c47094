//! Dashboard view model assembled from a score row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CategoryThresholds;
use crate::models::{HealthCategory, HealthScoreRecord};

/// Score components shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthComponent {
    Vaccinations,
    PreventiveCare,
    Weight,
    Conditions,
}

impl HealthComponent {
    pub fn label(&self) -> &'static str {
        match self {
            HealthComponent::Vaccinations => "Vaccinations",
            HealthComponent::PreventiveCare => "Preventive care",
            HealthComponent::Weight => "Weight",
            HealthComponent::Conditions => "Conditions",
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            HealthComponent::Vaccinations => "Bring vaccinations up to date",
            HealthComponent::PreventiveCare => "Book a wellness exam",
            HealthComponent::Weight => "Review diet and exercise with your vet",
            HealthComponent::Conditions => "Follow up on active conditions",
        }
    }
}

/// One categorized component score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentScore {
    pub component: HealthComponent,
    pub score: f64,
    pub category: HealthCategory,
}

/// Recommendation urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub priority: Priority,
    pub message: String,
}

/// Where the dashboard's numbers came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Reused a row inside the freshness window
    Cached,
    /// Fresh calculation, persisted as a new row
    Calculated,
    /// Scoring failed; zeroed default
    Fallback,
}

/// Everything the health screen renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthDashboard {
    pub pet_id: String,
    pub overall_score: f64,
    pub category: HealthCategory,
    pub components: Vec<ComponentScore>,
    /// Highest priority first
    pub recommendations: Vec<Recommendation>,
    pub calculated_at: Option<DateTime<Utc>>,
    pub source: ScoreSource,
}

impl HealthDashboard {
    /// Assemble a dashboard from a score row.
    pub fn from_record(
        record: &HealthScoreRecord,
        source: ScoreSource,
        thresholds: &CategoryThresholds,
    ) -> Self {
        let components: Vec<ComponentScore> = [
            (HealthComponent::Vaccinations, record.vaccination_score),
            (HealthComponent::PreventiveCare, record.preventive_care_score),
            (HealthComponent::Weight, record.weight_score),
            (HealthComponent::Conditions, record.condition_score),
        ]
        .into_iter()
        .map(|(component, score)| ComponentScore {
            component,
            score,
            category: thresholds.categorize(score),
        })
        .collect();

        let mut recommendations: Vec<Recommendation> = components
            .iter()
            .filter_map(|c| {
                let priority = match c.category {
                    HealthCategory::Poor | HealthCategory::Critical => Priority::High,
                    HealthCategory::Fair => Priority::Medium,
                    _ => return None,
                };
                Some(Recommendation {
                    priority,
                    message: c.component.advice().to_string(),
                })
            })
            .collect();

        for message in &record.recommendations {
            if !recommendations.iter().any(|r| &r.message == message) {
                recommendations.push(Recommendation {
                    priority: Priority::Low,
                    message: message.clone(),
                });
            }
        }
        // Stable: keeps component order within a priority.
        recommendations.sort_by_key(|r| r.priority);

        Self {
            pet_id: record.pet_id.clone(),
            overall_score: record.overall_score,
            category: thresholds.categorize(record.overall_score),
            components,
            recommendations,
            calculated_at: Some(record.calculated_at),
            source,
        }
    }

    /// Zeroed, FAIR default shown when scoring fails.
    pub fn fallback(pet_id: &str) -> Self {
        Self {
            pet_id: pet_id.to_string(),
            overall_score: 0.0,
            category: HealthCategory::Fair,
            components: Vec::new(),
            recommendations: Vec::new(),
            calculated_at: None,
            source: ScoreSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ScoreSource::Fallback
    }
}
