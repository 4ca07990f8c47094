//! Vet visit models.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{merge_nullable, merge_required, Entity};

/// A visit to a veterinary clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VetVisit {
    pub id: String,
    pub pet_id: String,
    pub visit_date: NaiveDate,
    /// Reason for the visit (e.g., "Annual checkup")
    pub reason: String,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub diagnosis: Option<String>,
    /// Amount billed
    pub cost: Option<f64>,
    /// Recommended follow-up appointment
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for logging a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVetVisit {
    pub visit_date: NaiveDate,
    pub reason: String,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub diagnosis: Option<String>,
    pub cost: Option<f64>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewVetVisit {
    /// Create with required fields.
    pub fn new(visit_date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            visit_date,
            reason: reason.into(),
            veterinarian: None,
            clinic: None,
            diagnosis: None,
            cost: None,
            follow_up_date: None,
            notes: None,
        }
    }
}

/// Partial visit update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VetVisitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for VetVisit {
    type Input = NewVetVisit;
    type Patch = VetVisitPatch;

    const TABLE: &'static str = "vet_visits";
    const LABEL: &'static str = "vet visit";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewVetVisit, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            visit_date: input.visit_date,
            reason: input.reason.clone(),
            veterinarian: input.veterinarian.clone(),
            clinic: input.clinic.clone(),
            diagnosis: input.diagnosis.clone(),
            cost: input.cost,
            follow_up_date: input.follow_up_date,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &VetVisitPatch, now: DateTime<Utc>) {
        merge_required(&mut self.visit_date, &patch.visit_date);
        merge_required(&mut self.reason, &patch.reason);
        merge_nullable(&mut self.veterinarian, &patch.veterinarian);
        merge_nullable(&mut self.clinic, &patch.clinic);
        merge_nullable(&mut self.diagnosis, &patch.diagnosis);
        merge_nullable(&mut self.cost, &patch.cost);
        merge_nullable(&mut self.follow_up_date, &patch.follow_up_date);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        other.visit_date.cmp(&self.visit_date)
    }
}
