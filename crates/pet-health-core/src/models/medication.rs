//! Medication models.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{is_active_on, merge_nullable, merge_required, Entity};

/// A prescribed medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
    /// Derived, same rule as treatments
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for adding a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
}

impl NewMedication {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            dosage: None,
            frequency: None,
            start_date,
            end_date: None,
            prescribed_by: None,
            notes: None,
        }
    }
}

/// Partial medication update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MedicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for Medication {
    type Input = NewMedication;
    type Patch = MedicationPatch;

    const TABLE: &'static str = "medications";
    const LABEL: &'static str = "medication";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewMedication, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            name: input.name.clone(),
            dosage: input.dosage.clone(),
            frequency: input.frequency.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            prescribed_by: input.prescribed_by.clone(),
            notes: input.notes.clone(),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &MedicationPatch, now: DateTime<Utc>) {
        merge_required(&mut self.name, &patch.name);
        merge_nullable(&mut self.dosage, &patch.dosage);
        merge_nullable(&mut self.frequency, &patch.frequency);
        merge_required(&mut self.start_date, &patch.start_date);
        merge_nullable(&mut self.end_date, &patch.end_date);
        merge_nullable(&mut self.prescribed_by, &patch.prescribed_by);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn refresh_derived(&mut self, today: NaiveDate) {
        self.is_active = is_active_on(self.end_date, today);
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        other.start_date.cmp(&self.start_date)
    }
}
