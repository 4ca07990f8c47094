//! Local implementation of the `calculate_health_score` procedure.
//!
//! Component scores (0-100):
//!
//! | Component       | Weight | Rule |
//! |-----------------|--------|------|
//! | Vaccinations    | 30%    | share of vaccines (latest dose each) not overdue; 50 with no records |
//! | Preventive care | 25%    | last visit within 365 days → 100, within 730 → 60, else 20 |
//! | Weight          | 20%    | relative change between the two latest weigh-ins |
//! | Conditions      | 25%    | 100 minus 5/15/30 per active mild/moderate/severe condition |

use chrono::NaiveDate;

use crate::models::{
    latest_doses, Condition, RawHealthScore, Severity, Vaccination, VetVisit, WeightEntry,
};

const VACCINATION_WEIGHT: f64 = 0.30;
const PREVENTIVE_CARE_WEIGHT: f64 = 0.25;
const WEIGHT_WEIGHT: f64 = 0.20;
const CONDITION_WEIGHT: f64 = 0.25;

/// Records the calculation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringInputs<'a> {
    pub vaccinations: &'a [Vaccination],
    pub visits: &'a [VetVisit],
    pub weights: &'a [WeightEntry],
    pub conditions: &'a [Condition],
}

/// Score a pet's records as of `today`.
pub fn score_pet(inputs: &ScoringInputs<'_>, today: NaiveDate) -> RawHealthScore {
    let mut recommendations = Vec::new();

    let vaccination_score = vaccination_score(inputs.vaccinations, today, &mut recommendations);
    let preventive_care_score = preventive_care_score(inputs.visits, today, &mut recommendations);
    let weight_score = weight_score(inputs.weights, &mut recommendations);
    let condition_score = condition_score(inputs.conditions, today, &mut recommendations);

    let overall = vaccination_score * VACCINATION_WEIGHT
        + preventive_care_score * PREVENTIVE_CARE_WEIGHT
        + weight_score * WEIGHT_WEIGHT
        + condition_score * CONDITION_WEIGHT;

    RawHealthScore {
        overall_score: overall.round().clamp(0.0, 100.0),
        vaccination_score,
        preventive_care_score,
        weight_score,
        condition_score,
        recommendations,
    }
}

fn vaccination_score(vaccinations: &[Vaccination], today: NaiveDate, recs: &mut Vec<String>) -> f64 {
    if vaccinations.is_empty() {
        recs.push("No vaccinations on record; ask your vet about core vaccines".into());
        return 50.0;
    }

    let latest = latest_doses(vaccinations);
    let overdue: Vec<&str> = latest
        .iter()
        .filter(|vax| vax.next_due_date.is_some_and(|due| due < today))
        .map(|vax| vax.vaccine_name.as_str())
        .collect();

    for name in &overdue {
        recs.push(format!("{} vaccination is overdue", name));
    }

    let current = latest.len() - overdue.len();
    100.0 * current as f64 / latest.len() as f64
}

fn preventive_care_score(visits: &[VetVisit], today: NaiveDate, recs: &mut Vec<String>) -> f64 {
    let days_since_visit = visits
        .iter()
        .map(|visit| visit.visit_date)
        .filter(|date| *date <= today)
        .max()
        .map(|last| (today - last).num_days());

    match days_since_visit {
        Some(days) if days <= 365 => 100.0,
        Some(days) if days <= 730 => {
            recs.push("Schedule an annual wellness exam".into());
            60.0
        }
        _ => {
            recs.push("No vet visit in over a year; schedule a wellness exam".into());
            20.0
        }
    }
}

fn weight_score(weights: &[WeightEntry], recs: &mut Vec<String>) -> f64 {
    let mut ordered: Vec<&WeightEntry> = weights.iter().collect();
    ordered.sort_by(|a, b| {
        b.recorded_on
            .cmp(&a.recorded_on)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let (latest, previous) = match ordered.as_slice() {
        [latest, previous, ..] => (latest.weight_kg(), previous.weight_kg()),
        _ => {
            recs.push("Log weight regularly to track trends".into());
            return 70.0;
        }
    };

    if previous <= 0.0 {
        return 70.0;
    }

    let change = (latest - previous).abs() / previous;
    if change >= 0.10 {
        recs.push(format!(
            "Weight changed by {:.0}% since the previous weigh-in; discuss with your vet",
            change * 100.0
        ));
    }

    match change {
        c if c < 0.05 => 100.0,
        c if c < 0.10 => 75.0,
        c if c < 0.20 => 50.0,
        _ => 25.0,
    }
}

fn condition_score(conditions: &[Condition], today: NaiveDate, recs: &mut Vec<String>) -> f64 {
    let mut penalty: f64 = 0.0;
    for condition in conditions {
        if condition.resolved_on.is_some_and(|resolved| resolved <= today) {
            continue;
        }
        penalty += match condition.severity {
            Severity::Mild => 5.0,
            Severity::Moderate => 15.0,
            Severity::Severe => {
                recs.push(format!("Monitor {} closely", condition.name));
                30.0
            }
        };
    }
    (100.0 - penalty).max(0.0)
}
