//! Medical condition and allergy models.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{cmp_optional_date_desc, is_active_on, merge_nullable, merge_required, Entity};

/// Clinical severity, shared by conditions and allergies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// A diagnosed medical condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    pub severity: Severity,
    pub diagnosed_on: Option<NaiveDate>,
    /// Day the condition resolved; ongoing when absent
    pub resolved_on: Option<NaiveDate>,
    pub is_chronic: bool,
    pub notes: Option<String>,
    /// Derived: not resolved, or resolution date still in the future
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for recording a condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCondition {
    pub name: String,
    pub severity: Severity,
    pub diagnosed_on: Option<NaiveDate>,
    pub resolved_on: Option<NaiveDate>,
    pub is_chronic: bool,
    pub notes: Option<String>,
}

impl NewCondition {
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
            diagnosed_on: None,
            resolved_on: None,
            is_chronic: false,
            notes: None,
        }
    }
}

/// Partial condition update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ConditionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosed_on: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_on: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_chronic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for Condition {
    type Input = NewCondition;
    type Patch = ConditionPatch;

    const TABLE: &'static str = "conditions";
    const LABEL: &'static str = "condition";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewCondition, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            name: input.name.clone(),
            severity: input.severity,
            diagnosed_on: input.diagnosed_on,
            resolved_on: input.resolved_on,
            is_chronic: input.is_chronic,
            notes: input.notes.clone(),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &ConditionPatch, now: DateTime<Utc>) {
        merge_required(&mut self.name, &patch.name);
        merge_required(&mut self.severity, &patch.severity);
        merge_nullable(&mut self.diagnosed_on, &patch.diagnosed_on);
        merge_nullable(&mut self.resolved_on, &patch.resolved_on);
        merge_required(&mut self.is_chronic, &patch.is_chronic);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn refresh_derived(&mut self, today: NaiveDate) {
        self.is_active = is_active_on(self.resolved_on, today);
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        cmp_optional_date_desc(self.diagnosed_on, other.diagnosed_on)
    }
}

/// A known allergy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allergy {
    pub id: String,
    pub pet_id: String,
    /// What the pet reacts to (e.g., "chicken", "penicillin")
    pub allergen: String,
    pub reaction: Option<String>,
    pub severity: Severity,
    pub identified_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for recording an allergy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAllergy {
    pub allergen: String,
    pub reaction: Option<String>,
    pub severity: Severity,
    pub identified_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewAllergy {
    pub fn new(allergen: impl Into<String>, severity: Severity) -> Self {
        Self {
            allergen: allergen.into(),
            reaction: None,
            severity,
            identified_on: None,
            notes: None,
        }
    }
}

/// Partial allergy update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AllergyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identified_on: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for Allergy {
    type Input = NewAllergy;
    type Patch = AllergyPatch;

    const TABLE: &'static str = "allergies";
    const LABEL: &'static str = "allergy";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewAllergy, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            allergen: input.allergen.clone(),
            reaction: input.reaction.clone(),
            severity: input.severity,
            identified_on: input.identified_on,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &AllergyPatch, now: DateTime<Utc>) {
        merge_required(&mut self.allergen, &patch.allergen);
        merge_nullable(&mut self.reaction, &patch.reaction);
        merge_required(&mut self.severity, &patch.severity);
        merge_nullable(&mut self.identified_on, &patch.identified_on);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        self.allergen
            .to_lowercase()
            .cmp(&other.allergen.to_lowercase())
    }
}
