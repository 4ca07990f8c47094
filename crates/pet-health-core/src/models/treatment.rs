//! Treatment models (flea/tick, deworming, heartworm prevention, ...).

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{is_active_on, merge_nullable, merge_required, Entity};

/// Kind of treatment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentKind {
    FleaTick,
    Deworming,
    Heartworm,
    Dental,
    Grooming,
    #[serde(other)]
    Other,
}

/// A treatment course for a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    /// Server UUID, or a `temp-` id while unconfirmed
    pub id: String,
    /// Owning pet
    pub pet_id: String,
    /// Product or procedure name
    pub name: String,
    /// Treatment category
    pub treatment_type: TreatmentKind,
    /// Dosage as written on the label (e.g., "1 tablet")
    pub dosage: Option<String>,
    /// Frequency (e.g., "monthly")
    pub frequency: Option<String>,
    /// First day of the course
    pub start_date: NaiveDate,
    /// Last day of the course; open-ended when absent
    pub end_date: Option<NaiveDate>,
    /// Prescribing veterinarian
    pub prescribed_by: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Derived: no end date, or end date strictly in the future
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp (server-assigned once confirmed)
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTreatment {
    pub name: String,
    pub treatment_type: TreatmentKind,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
}

impl NewTreatment {
    /// Create with required fields.
    pub fn new(name: impl Into<String>, treatment_type: TreatmentKind, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            treatment_type,
            dosage: None,
            frequency: None,
            start_date,
            end_date: None,
            prescribed_by: None,
            notes: None,
        }
    }
}

/// Partial treatment update. Nullable fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TreatmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_type: Option<TreatmentKind>,
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

impl TreatmentPatch {
    /// Patch that ends the course on the given date.
    pub fn end_on(date: NaiveDate) -> Self {
        Self {
            end_date: Some(Some(date)),
            ..Default::default()
        }
    }
}

impl Entity for Treatment {
    type Input = NewTreatment;
    type Patch = TreatmentPatch;

    const TABLE: &'static str = "treatments";
    const LABEL: &'static str = "treatment";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewTreatment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            name: input.name.clone(),
            treatment_type: input.treatment_type,
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

    fn apply_patch(&mut self, patch: &TreatmentPatch, now: DateTime<Utc>) {
        merge_required(&mut self.name, &patch.name);
        merge_required(&mut self.treatment_type, &patch.treatment_type);
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
