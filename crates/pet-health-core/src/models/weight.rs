//! Weight log models.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{merge_nullable, merge_required, Entity};

const KG_PER_LB: f64 = 0.453_592_37;

/// Unit a weight was recorded in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    /// Convert a value in this unit to kilograms.
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }
}

/// A single weigh-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub id: String,
    pub pet_id: String,
    /// Weight in `unit`
    pub weight: f64,
    pub unit: WeightUnit,
    pub recorded_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeightEntry {
    /// Weight normalized to kilograms.
    pub fn weight_kg(&self) -> f64 {
        self.unit.to_kg(self.weight)
    }
}

/// Fields for logging a weigh-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWeightEntry {
    pub weight: f64,
    pub unit: WeightUnit,
    pub recorded_on: NaiveDate,
    pub notes: Option<String>,
}

impl NewWeightEntry {
    pub fn new(weight: f64, unit: WeightUnit, recorded_on: NaiveDate) -> Self {
        Self {
            weight,
            unit,
            recorded_on,
            notes: None,
        }
    }
}

/// Partial weigh-in update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WeightEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for WeightEntry {
    type Input = NewWeightEntry;
    type Patch = WeightEntryPatch;

    const TABLE: &'static str = "weight_entries";
    const LABEL: &'static str = "weight entry";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewWeightEntry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            weight: input.weight,
            unit: input.unit,
            recorded_on: input.recorded_on,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &WeightEntryPatch, now: DateTime<Utc>) {
        merge_required(&mut self.weight, &patch.weight);
        merge_required(&mut self.unit, &patch.unit);
        merge_required(&mut self.recorded_on, &patch.recorded_on);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        other.recorded_on.cmp(&self.recorded_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_kg() {
        let now = Utc::now();
        let lb = WeightEntry::build(
            "w1".into(),
            "pet-1",
            &NewWeightEntry::new(10.0, WeightUnit::Lb, now.date_naive()),
            now,
        );
        assert!((lb.weight_kg() - 4.5359237).abs() < 1e-9);

        let kg = WeightEntry::build(
            "w2".into(),
            "pet-1",
            &NewWeightEntry::new(12.5, WeightUnit::Kg, now.date_naive()),
            now,
        );
        assert_eq!(kg.weight_kg(), 12.5);
    }

    #[test]
    fn test_unit_wire_format() {
        assert_eq!(serde_json::to_string(&WeightUnit::Lb).unwrap(), "\"lb\"");
    }
}
