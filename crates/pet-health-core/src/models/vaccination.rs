//! Vaccination models.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{merge_nullable, merge_required, Entity};

/// Where a vaccination stands relative to its next due date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationStatus {
    /// No booster scheduled, or booster beyond the due-soon horizon
    Current,
    /// Booster due within the horizon
    DueSoon,
    /// Booster date has passed
    Overdue,
}

/// An administered vaccine dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccination {
    pub id: String,
    pub pet_id: String,
    /// Vaccine name (e.g., "Rabies", "DHPP")
    pub vaccine_name: String,
    /// Day the dose was given
    pub date_given: NaiveDate,
    /// Booster due date, if any
    pub next_due_date: Option<NaiveDate>,
    pub veterinarian: Option<String>,
    /// Manufacturer lot number (for recalls)
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vaccination {
    /// Status as of `today`, with boosters due within `due_soon_days` flagged.
    pub fn status_on(&self, today: NaiveDate, due_soon_days: i64) -> VaccinationStatus {
        match self.next_due_date {
            Some(due) if due < today => VaccinationStatus::Overdue,
            Some(due) if (due - today).num_days() <= due_soon_days => VaccinationStatus::DueSoon,
            _ => VaccinationStatus::Current,
        }
    }

    /// Canonical vaccine name for grouping doses of the same vaccine.
    pub fn canonical_name(&self) -> String {
        self.vaccine_name.trim().to_lowercase()
    }
}

/// The most recent dose of each distinct vaccine, ordered by vaccine name.
///
/// A booster supersedes earlier doses of the same vaccine, so only the
/// latest dose decides whether a vaccine is overdue.
pub fn latest_doses(vaccinations: &[Vaccination]) -> Vec<&Vaccination> {
    let mut latest: HashMap<String, &Vaccination> = HashMap::new();
    for vax in vaccinations {
        latest
            .entry(vax.canonical_name())
            .and_modify(|current| {
                if vax.date_given > current.date_given {
                    *current = vax;
                }
            })
            .or_insert(vax);
    }
    let mut doses: Vec<(String, &Vaccination)> = latest.into_iter().collect();
    doses.sort_by(|a, b| a.0.cmp(&b.0));
    doses.into_iter().map(|(_, vax)| vax).collect()
}

/// Fields for recording a vaccination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVaccination {
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

impl NewVaccination {
    /// Create with required fields.
    pub fn new(vaccine_name: impl Into<String>, date_given: NaiveDate) -> Self {
        Self {
            vaccine_name: vaccine_name.into(),
            date_given,
            next_due_date: None,
            veterinarian: None,
            batch_number: None,
            notes: None,
        }
    }
}

/// Partial vaccination update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VaccinationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccine_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_given: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for Vaccination {
    type Input = NewVaccination;
    type Patch = VaccinationPatch;

    const TABLE: &'static str = "vaccinations";
    const LABEL: &'static str = "vaccination";

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> &str {
        &self.pet_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_input(id: String, pet_id: &str, input: &NewVaccination, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pet_id: pet_id.to_string(),
            vaccine_name: input.vaccine_name.clone(),
            date_given: input.date_given,
            next_due_date: input.next_due_date,
            veterinarian: input.veterinarian.clone(),
            batch_number: input.batch_number.clone(),
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &VaccinationPatch, now: DateTime<Utc>) {
        merge_required(&mut self.vaccine_name, &patch.vaccine_name);
        merge_required(&mut self.date_given, &patch.date_given);
        merge_nullable(&mut self.next_due_date, &patch.next_due_date);
        merge_nullable(&mut self.veterinarian, &patch.veterinarian);
        merge_nullable(&mut self.batch_number, &patch.batch_number);
        merge_nullable(&mut self.notes, &patch.notes);
        self.updated_at = now;
    }

    fn cmp_order(&self, other: &Self) -> Ordering {
        other.date_given.cmp(&self.date_given)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_on() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut input = NewVaccination::new("Rabies", today - Duration::days(365));
        let mut vax = Vaccination::build("v1".into(), "pet-1", &input, now);
        assert_eq!(vax.status_on(today, 30), VaccinationStatus::Current);

        input.next_due_date = Some(today - Duration::days(1));
        vax = Vaccination::build("v1".into(), "pet-1", &input, now);
        assert_eq!(vax.status_on(today, 30), VaccinationStatus::Overdue);

        input.next_due_date = Some(today);
        vax = Vaccination::build("v1".into(), "pet-1", &input, now);
        assert_eq!(vax.status_on(today, 30), VaccinationStatus::DueSoon);

        input.next_due_date = Some(today + Duration::days(31));
        vax = Vaccination::build("v1".into(), "pet-1", &input, now);
        assert_eq!(vax.status_on(today, 30), VaccinationStatus::Current);
    }

    #[test]
    fn test_canonical_name() {
        let now = Utc::now();
        let input = NewVaccination::new("  DHPP ", now.date_naive());
        let vax = Vaccination::build("v1".into(), "pet-1", &input, now);
        assert_eq!(vax.canonical_name(), "dhpp");
    }

    #[test]
    fn test_latest_doses() {
        let now = Utc::now();
        let today = now.date_naive();
        let doses = vec![
            Vaccination::build("old".into(), "pet-1", &NewVaccination::new("Rabies", today - Duration::days(400)), now),
            Vaccination::build("dhpp".into(), "pet-1", &NewVaccination::new("DHPP", today - Duration::days(20)), now),
            Vaccination::build("new".into(), "pet-1", &NewVaccination::new("rabies ", today - Duration::days(10)), now),
        ];

        let ids: Vec<&str> = latest_doses(&doses).iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["dhpp", "new"]);
    }
}
