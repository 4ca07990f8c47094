//! Derived views over mirrors.
//!
//! Every selector is a pure function of records and an evaluation date.
//! [`DerivedView`] memoizes one selector on (mirror version, date).

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::mirror::LocalMirror;
use crate::models::{
    is_active_on, latest_doses, Allergy, Condition, Entity, Medication, Severity, Treatment,
    Vaccination, VetVisit, WeightEntry,
};

type Selector<E, T> = Box<dyn Fn(&[E], NaiveDate) -> T + Send + Sync>;

/// A selector memoized on the mirror version and evaluation date.
pub struct DerivedView<E, T> {
    select: Selector<E, T>,
    cached: Option<(u64, NaiveDate, T)>,
}

impl<E: Entity, T> DerivedView<E, T> {
    pub fn new(select: impl Fn(&[E], NaiveDate) -> T + Send + Sync + 'static) -> Self {
        Self {
            select: Box::new(select),
            cached: None,
        }
    }

    /// Current value, recomputed only when the mirror or date changed.
    pub fn get(&mut self, mirror: &LocalMirror<E>, today: NaiveDate) -> &T {
        let version = mirror.version();
        let stale = !matches!(&self.cached, Some((v, d, _)) if *v == version && *d == today);
        if stale {
            self.cached = None;
        }
        let select = &self.select;
        let (_, _, value) = self
            .cached
            .get_or_insert_with(|| (version, today, select(mirror.records(), today)));
        value
    }

    /// Whether the next `get` with these arguments would recompute.
    pub fn is_stale(&self, mirror: &LocalMirror<E>, today: NaiveDate) -> bool {
        !matches!(&self.cached, Some((v, d, _)) if *v == mirror.version() && *d == today)
    }
}

pub fn active_treatments(treatments: &[Treatment], today: NaiveDate) -> Vec<Treatment> {
    treatments
        .iter()
        .filter(|t| is_active_on(t.end_date, today))
        .cloned()
        .collect()
}

pub fn active_medications(medications: &[Medication], today: NaiveDate) -> Vec<Medication> {
    medications
        .iter()
        .filter(|m| is_active_on(m.end_date, today))
        .cloned()
        .collect()
}

pub fn active_conditions(conditions: &[Condition], today: NaiveDate) -> Vec<Condition> {
    conditions
        .iter()
        .filter(|c| is_active_on(c.resolved_on, today))
        .cloned()
        .collect()
}

/// Latest dose of each vaccine whose booster date has passed.
pub fn overdue_vaccinations(vaccinations: &[Vaccination], today: NaiveDate) -> Vec<Vaccination> {
    latest_doses(vaccinations)
        .into_iter()
        .filter(|v| v.next_due_date.is_some_and(|due| due < today))
        .cloned()
        .collect()
}

/// Latest dose of each vaccine with a booster due within `horizon_days`,
/// soonest first.
pub fn due_soon_vaccinations(
    vaccinations: &[Vaccination],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<Vaccination> {
    let until = window_end(today, horizon_days);
    let mut due: Vec<Vaccination> = latest_doses(vaccinations)
        .into_iter()
        .filter(|v| v.next_due_date.is_some_and(|due| due >= today && due <= until))
        .cloned()
        .collect();
    due.sort_by_key(|v| v.next_due_date);
    due
}

/// Last day of a `horizon_days` window starting at `today`. Horizons past
/// the calendar's range saturate at [`NaiveDate::MAX`].
fn window_end(today: NaiveDate, horizon_days: i64) -> NaiveDate {
    Duration::try_days(horizon_days)
        .and_then(|span| today.checked_add_signed(span))
        .unwrap_or(if horizon_days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Visits with a follow-up on or after `today`, soonest first.
pub fn upcoming_visits(visits: &[VetVisit], today: NaiveDate) -> Vec<VetVisit> {
    let mut upcoming: Vec<VetVisit> = visits
        .iter()
        .filter(|v| v.follow_up_date.is_some_and(|date| date >= today))
        .cloned()
        .collect();
    upcoming.sort_by_key(|v| v.follow_up_date);
    upcoming
}

/// Most recent weigh-in (the mirror keeps them newest first).
pub fn latest_weight(weights: &[WeightEntry]) -> Option<WeightEntry> {
    weights.first().cloned()
}

/// Change between the two most recent weigh-ins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub latest_kg: f64,
    pub previous_kg: f64,
    pub change_kg: f64,
    /// Relative change in percent; `None` when the previous weight is zero
    pub change_percent: Option<f64>,
}

pub fn weight_trend(weights: &[WeightEntry]) -> Option<WeightTrend> {
    let [latest, previous, ..] = weights else {
        return None;
    };
    let latest_kg = latest.weight_kg();
    let previous_kg = previous.weight_kg();
    let change_kg = latest_kg - previous_kg;
    Some(WeightTrend {
        latest_kg,
        previous_kg,
        change_kg,
        change_percent: (previous_kg > 0.0).then(|| change_kg / previous_kg * 100.0),
    })
}

pub fn severe_allergies(allergies: &[Allergy]) -> Vec<Allergy> {
    allergies
        .iter()
        .filter(|a| a.severity == Severity::Severe)
        .cloned()
        .collect()
}

/// What an upcoming calendar entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpcomingEventKind {
    VaccinationDue,
    VisitFollowUp,
    TreatmentEnds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub date: NaiveDate,
    pub kind: UpcomingEventKind,
    pub title: String,
    /// Id of the record the event comes from
    pub record_id: String,
}

impl UpcomingEvent {
    fn cmp_calendar(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.record_id.cmp(&other.record_id))
    }
}

/// Records feeding the upcoming-events calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarSources<'a> {
    pub vaccinations: &'a [Vaccination],
    pub visits: &'a [VetVisit],
    pub treatments: &'a [Treatment],
}

/// Dated events in `[today, today + horizon_days]`, date ascending.
///
/// Vaccinations contribute only their latest dose per vaccine; overdue
/// boosters are left to [`overdue_vaccinations`].
pub fn upcoming_events(
    sources: &CalendarSources<'_>,
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<UpcomingEvent> {
    let until = window_end(today, horizon_days);
    let in_window = |date: NaiveDate| date >= today && date <= until;
    let mut events = Vec::new();

    for vax in latest_doses(sources.vaccinations) {
        if let Some(due) = vax.next_due_date.filter(|d| in_window(*d)) {
            events.push(UpcomingEvent {
                date: due,
                kind: UpcomingEventKind::VaccinationDue,
                title: format!("{} booster due", vax.vaccine_name),
                record_id: vax.id.clone(),
            });
        }
    }

    for visit in sources.visits {
        if let Some(date) = visit.follow_up_date.filter(|d| in_window(*d)) {
            events.push(UpcomingEvent {
                date,
                kind: UpcomingEventKind::VisitFollowUp,
                title: format!("Follow-up: {}", visit.reason),
                record_id: visit.id.clone(),
            });
        }
    }

    for treatment in sources.treatments {
        if let Some(end) = treatment.end_date.filter(|d| in_window(*d)) {
            events.push(UpcomingEvent {
                date: end,
                kind: UpcomingEventKind::TreatmentEnds,
                title: format!("{} ends", treatment.name),
                record_id: treatment.id.clone(),
            });
        }
    }

    events.sort_by(UpcomingEvent::cmp_calendar);
    events
}
