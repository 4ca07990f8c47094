//! Pet Health Core Library
//!
//! Local-first pet health records with optimistic UI state and a health
//! score dashboard.
//!
//! # Architecture
//!
//! ```text
//!   UI action
//!       │
//!       ▼
//!   EntityStore ──apply──▶ LocalMirror ──watch──▶ subscribers / selectors
//!       │                      ▲
//!       │ gateway call         │ refetch (ok) / restore snapshot (err)
//!       ▼                      │
//!   EntityGateway ─────────────┘
//!   (SQLite on device, REST for the hosted backend)
//!
//!   HealthScoreAggregator ──▶ ScoreGateway: cached row or calculate_health_score
//! ```
//!
//! # Modules
//!
//! - [`models`]: Entity records (treatments, vaccinations, visits, ...)
//! - [`gateway`]: Remote store contracts and errors
//! - [`store`]: Local mirror, optimistic reconciler, derived views, pet scope
//! - [`health`]: Score categories, local scoring, dashboard aggregator
//! - [`db`]: SQLite persistence and the on-device gateway
//! - [`config`]: Tunables

pub mod config;
pub mod db;
pub mod gateway;
pub mod health;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, HealthConfig};
pub use db::{Database, SqliteGateway};
pub use gateway::{EntityGateway, RemoteError, RemoteResult, ScoreGateway};
pub use health::{categorize, HealthDashboard, HealthScoreAggregator};
pub use models::{
    Allergy, Condition, Entity, HealthCategory, Medication, Treatment, Vaccination, VetVisit,
    WeightEntry,
};
pub use store::{EntityStore, LocalMirror, MutationState, PetRecords, StoreError, StoreResult};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use config::MAX_HORIZON_DAYS;

use health::{ComponentScore, Recommendation};
use models::{
    NewTreatment, NewVaccination, NewWeightEntry, TreatmentKind, TreatmentPatch, WeightUnit,
};
use store::{selectors, DerivedView, UpcomingEvent};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PetHealthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Network or server failure; the same call may succeed on retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for PetHealthError {
    fn from(e: db::DbError) -> Self {
        PetHealthError::DatabaseError(e.to_string())
    }
}

impl From<RemoteError> for PetHealthError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::NotFound(id) => PetHealthError::NotFound(id),
            RemoteError::Validation(msg) => PetHealthError::InvalidInput(msg),
            other if other.is_transient() => PetHealthError::Unavailable(other.to_string()),
            other => PetHealthError::RemoteError(other.to_string()),
        }
    }
}

impl From<StoreError> for PetHealthError {
    fn from(e: StoreError) -> Self {
        match &e {
            StoreError::UnknownRecord { .. } => PetHealthError::NotFound(e.to_string()),
            StoreError::Remote { source, .. } => match source {
                RemoteError::NotFound(_) => PetHealthError::NotFound(e.to_string()),
                RemoteError::Validation(_) => PetHealthError::InvalidInput(e.to_string()),
                other if other.is_transient() => PetHealthError::Unavailable(e.to_string()),
                _ => PetHealthError::RemoteError(e.to_string()),
            },
        }
    }
}

impl From<ConfigError> for PetHealthError {
    fn from(e: ConfigError) -> Self {
        PetHealthError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PetHealthError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PetHealthError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, PetHealthError> {
    value
        .trim()
        .parse()
        .map_err(|_| PetHealthError::InvalidInput(format!("{field}: expected YYYY-MM-DD, got {value:?}")))
}

fn parse_optional_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, PetHealthError> {
    value.map(|v| parse_date(field, &v)).transpose()
}

/// Parse a snake_case wire name into one of the model enums.
fn parse_enum<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T, PetHealthError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase()))
        .map_err(|_| PetHealthError::InvalidInput(format!("{field}: unknown value {value:?}")))
}

fn wire_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// Settings come from `PET_HEALTH_*` environment variables.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<PetHealthCore>, PetHealthError> {
    let db = Database::open(&path)?;
    PetHealthCore::new(db, HealthConfig::from_env()?)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<PetHealthCore>, PetHealthError> {
    let db = Database::open_in_memory()?;
    PetHealthCore::new(db, HealthConfig::default())
}

// =========================================================================
// Main API Objects
// =========================================================================

/// Database handle shared by every pet session.
#[derive(uniffi::Object)]
pub struct PetHealthCore {
    gateway: Arc<SqliteGateway>,
    config: HealthConfig,
}

impl PetHealthCore {
    fn new(db: Database, config: HealthConfig) -> Result<Arc<Self>, PetHealthError> {
        config.validate()?;
        Ok(Arc::new(Self {
            gateway: Arc::new(SqliteGateway::new(db)),
            config,
        }))
    }
}

#[uniffi::export]
impl PetHealthCore {
    /// Start a session for one pet. Nothing is fetched until `load`.
    pub fn open_pet(&self, pet_id: String) -> Arc<PetSession> {
        Arc::new(PetSession {
            records: PetRecords::new(pet_id, Arc::clone(&self.gateway)),
            health: HealthScoreAggregator::new(Arc::clone(&self.gateway), self.config.clone()),
            active_treatments: Mutex::new(DerivedView::new(selectors::active_treatments)),
        })
    }
}

/// One pet's stores and dashboard. Dropping the session drops its mirrors.
#[derive(uniffi::Object)]
pub struct PetSession {
    records: PetRecords<SqliteGateway>,
    health: HealthScoreAggregator<SqliteGateway>,
    active_treatments: Mutex<DerivedView<Treatment, Vec<Treatment>>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl PetSession {
    pub fn pet_id(&self) -> String {
        self.records.pet_id().to_string()
    }

    /// Fetch every record type for the pet.
    pub async fn load(&self) -> Result<(), PetHealthError> {
        Ok(self.records.load_all().await?)
    }

    // =========================================================================
    // Treatments
    // =========================================================================

    pub async fn add_treatment(&self, input: FfiNewTreatment) -> Result<FfiTreatment, PetHealthError> {
        let input = input.into_model()?;
        let created = self.records.treatments().create(input).await?;
        Ok(created.into())
    }

    /// Set a treatment's end date; it stops being active after that day.
    pub async fn end_treatment(&self, id: String, end_date: String) -> Result<FfiTreatment, PetHealthError> {
        let end = parse_date("end_date", &end_date)?;
        let updated = self
            .records
            .treatments()
            .update(&id, TreatmentPatch::end_on(end))
            .await?;
        Ok(updated.into())
    }

    pub async fn delete_treatment(&self, id: String) -> Result<(), PetHealthError> {
        Ok(self.records.treatments().delete(&id).await?)
    }

    pub fn treatments(&self) -> Vec<FfiTreatment> {
        self.records
            .treatments()
            .records()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub fn active_treatments(&self) -> Result<Vec<FfiTreatment>, PetHealthError> {
        let mirror = self.records.treatments().mirror();
        let mut view = self.active_treatments.lock()?;
        let active = view.get(&mirror, models::today());
        Ok(active.iter().cloned().map(Into::into).collect())
    }

    // =========================================================================
    // Vaccinations
    // =========================================================================

    pub async fn add_vaccination(&self, input: FfiNewVaccination) -> Result<FfiVaccination, PetHealthError> {
        let input = input.into_model()?;
        let created = self.records.vaccinations().create(input).await?;
        Ok(FfiVaccination::from_model(created, self.health.config().due_soon_days))
    }

    pub async fn delete_vaccination(&self, id: String) -> Result<(), PetHealthError> {
        Ok(self.records.vaccinations().delete(&id).await?)
    }

    pub fn vaccinations(&self) -> Vec<FfiVaccination> {
        let due_soon_days = self.health.config().due_soon_days;
        self.records
            .vaccinations()
            .records()
            .into_iter()
            .map(|v| FfiVaccination::from_model(v, due_soon_days))
            .collect()
    }

    // =========================================================================
    // Weight
    // =========================================================================

    /// Log a weigh-in; `unit` is "kg" or "lb".
    pub async fn log_weight(
        &self,
        weight: f64,
        unit: String,
        recorded_on: String,
        notes: Option<String>,
    ) -> Result<FfiWeightEntry, PetHealthError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PetHealthError::InvalidInput(format!("weight must be positive, got {weight}")));
        }
        let unit: WeightUnit = parse_enum("unit", &unit)?;
        let mut input = NewWeightEntry::new(weight, unit, parse_date("recorded_on", &recorded_on)?);
        input.notes = notes;
        let created = self.records.weights().create(input).await?;
        Ok(created.into())
    }

    pub async fn delete_weight(&self, id: String) -> Result<(), PetHealthError> {
        Ok(self.records.weights().delete(&id).await?)
    }

    pub fn weights(&self) -> Vec<FfiWeightEntry> {
        self.records
            .weights()
            .records()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Boosters, follow-ups and treatment end dates within `horizon_days`
    /// (the configured horizon when unset), clamped to `0..=MAX_HORIZON_DAYS`.
    pub fn upcoming_events(&self, horizon_days: Option<i64>) -> Vec<FfiUpcomingEvent> {
        let horizon = horizon_days
            .unwrap_or(self.health.config().upcoming_horizon_days)
            .clamp(0, MAX_HORIZON_DAYS);
        self.records
            .upcoming_events(models::today(), horizon)
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Dashboard from the cached score, or a fresh calculation. Falls back
    /// to a neutral dashboard when scoring fails.
    pub async fn health_dashboard(&self) -> FfiHealthDashboard {
        self.health
            .compute_or_default(self.records.pet_id())
            .await
            .into()
    }

    /// Recalculate the score, ignoring any cached row.
    pub async fn recalculate_health_score(&self) -> Result<FfiHealthDashboard, PetHealthError> {
        let dashboard = self.health.recalculate(self.records.pet_id()).await?;
        Ok(dashboard.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe treatment input. Dates are ISO-8601 (`YYYY-MM-DD`).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewTreatment {
    pub name: String,
    /// snake_case kind, e.g. "flea_tick"; unknown kinds become "other"
    pub treatment_type: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
}

impl FfiNewTreatment {
    fn into_model(self) -> Result<NewTreatment, PetHealthError> {
        if self.name.trim().is_empty() {
            return Err(PetHealthError::InvalidInput("name must not be empty".into()));
        }
        let kind: TreatmentKind = parse_enum("treatment_type", &self.treatment_type)?;
        let mut input = NewTreatment::new(self.name, kind, parse_date("start_date", &self.start_date)?);
        input.dosage = self.dosage;
        input.frequency = self.frequency;
        input.end_date = parse_optional_date("end_date", self.end_date)?;
        input.prescribed_by = self.prescribed_by;
        input.notes = self.notes;
        Ok(input)
    }
}

/// FFI-safe treatment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatment {
    pub id: String,
    pub name: String,
    pub treatment_type: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub prescribed_by: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    /// Still waiting for the server to confirm
    pub pending: bool,
}

impl From<Treatment> for FfiTreatment {
    fn from(t: Treatment) -> Self {
        Self {
            pending: t.is_temporary(),
            treatment_type: wire_name(&t.treatment_type),
            start_date: t.start_date.to_string(),
            end_date: t.end_date.map(|d| d.to_string()),
            id: t.id,
            name: t.name,
            dosage: t.dosage,
            frequency: t.frequency,
            prescribed_by: t.prescribed_by,
            notes: t.notes,
            is_active: t.is_active,
        }
    }
}

/// FFI-safe vaccination input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewVaccination {
    pub vaccine_name: String,
    pub date_given: String,
    pub next_due_date: Option<String>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

impl FfiNewVaccination {
    fn into_model(self) -> Result<NewVaccination, PetHealthError> {
        if self.vaccine_name.trim().is_empty() {
            return Err(PetHealthError::InvalidInput("vaccine_name must not be empty".into()));
        }
        let mut input = NewVaccination::new(self.vaccine_name, parse_date("date_given", &self.date_given)?);
        input.next_due_date = parse_optional_date("next_due_date", self.next_due_date)?;
        input.veterinarian = self.veterinarian;
        input.batch_number = self.batch_number;
        input.notes = self.notes;
        Ok(input)
    }
}

/// FFI-safe vaccination with its status as of today.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVaccination {
    pub id: String,
    pub vaccine_name: String,
    pub date_given: String,
    pub next_due_date: Option<String>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    /// "current", "due_soon" or "overdue"
    pub status: String,
    pub pending: bool,
}

impl FfiVaccination {
    fn from_model(v: Vaccination, due_soon_days: i64) -> Self {
        Self {
            status: wire_name(&v.status_on(models::today(), due_soon_days)),
            pending: v.is_temporary(),
            date_given: v.date_given.to_string(),
            next_due_date: v.next_due_date.map(|d| d.to_string()),
            id: v.id,
            vaccine_name: v.vaccine_name,
            veterinarian: v.veterinarian,
            batch_number: v.batch_number,
            notes: v.notes,
        }
    }
}

/// FFI-safe weigh-in.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeightEntry {
    pub id: String,
    pub weight: f64,
    pub unit: String,
    pub weight_kg: f64,
    pub recorded_on: String,
    pub notes: Option<String>,
    pub pending: bool,
}

impl From<WeightEntry> for FfiWeightEntry {
    fn from(w: WeightEntry) -> Self {
        Self {
            weight_kg: w.weight_kg(),
            unit: wire_name(&w.unit),
            recorded_on: w.recorded_on.to_string(),
            pending: w.is_temporary(),
            id: w.id,
            weight: w.weight,
            notes: w.notes,
        }
    }
}

/// FFI-safe calendar entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUpcomingEvent {
    pub date: String,
    /// "vaccination_due", "visit_follow_up" or "treatment_ends"
    pub kind: String,
    pub title: String,
    pub record_id: String,
}

impl From<UpcomingEvent> for FfiUpcomingEvent {
    fn from(event: UpcomingEvent) -> Self {
        Self {
            date: event.date.to_string(),
            kind: wire_name(&event.kind),
            title: event.title,
            record_id: event.record_id,
        }
    }
}

/// FFI-safe component score.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiComponentScore {
    pub label: String,
    pub score: f64,
    pub category: String,
}

impl From<ComponentScore> for FfiComponentScore {
    fn from(c: ComponentScore) -> Self {
        Self {
            label: c.component.label().to_string(),
            score: c.score,
            category: c.category.to_string(),
        }
    }
}

/// FFI-safe recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendation {
    /// "high", "medium" or "low"
    pub priority: String,
    pub message: String,
}

impl From<Recommendation> for FfiRecommendation {
    fn from(r: Recommendation) -> Self {
        Self {
            priority: wire_name(&r.priority),
            message: r.message,
        }
    }
}

/// FFI-safe dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthDashboard {
    pub pet_id: String,
    pub overall_score: f64,
    pub category: String,
    pub components: Vec<FfiComponentScore>,
    pub recommendations: Vec<FfiRecommendation>,
    /// RFC 3339; absent for the fallback dashboard
    pub calculated_at: Option<String>,
    /// "cached", "calculated" or "fallback"
    pub source: String,
}

impl From<HealthDashboard> for FfiHealthDashboard {
    fn from(d: HealthDashboard) -> Self {
        Self {
            category: d.category.to_string(),
            calculated_at: d.calculated_at.map(|at| at.to_rfc3339()),
            source: wire_name(&d.source),
            pet_id: d.pet_id,
            overall_score: d.overall_score,
            components: d.components.into_iter().map(Into::into).collect(),
            recommendations: d.recommendations.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread().build().unwrap()
    }

    fn flea_treatment(start: &str, end: Option<&str>) -> FfiNewTreatment {
        FfiNewTreatment {
            name: "Bravecto".into(),
            treatment_type: "flea_tick".into(),
            dosage: Some("1 chew".into()),
            frequency: Some("every 12 weeks".into()),
            start_date: start.into(),
            end_date: end.map(String::from),
            prescribed_by: None,
            notes: None,
        }
    }

    #[test]
    fn test_session_treatment_flow() {
        let core = open_database_in_memory().unwrap();
        let session = core.open_pet("rex".into());
        let today = models::today().to_string();

        runtime().block_on(async {
            session.load().await.unwrap();
            let created = session.add_treatment(flea_treatment(&today, None)).await.unwrap();
            assert!(created.is_active);
            assert!(!created.pending);
            assert_eq!(created.treatment_type, "flea_tick");
            assert_eq!(session.active_treatments().unwrap().len(), 1);

            let ended = session.end_treatment(created.id.clone(), today.clone()).await.unwrap();
            assert!(!ended.is_active);
            assert!(session.active_treatments().unwrap().is_empty());

            session.delete_treatment(created.id).await.unwrap();
            assert!(session.treatments().is_empty());
        });
    }

    #[test]
    fn test_invalid_dates_rejected() {
        let core = open_database_in_memory().unwrap();
        let session = core.open_pet("rex".into());

        runtime().block_on(async {
            let err = session.add_treatment(flea_treatment("06/15/2024", None)).await.unwrap_err();
            assert!(matches!(err, PetHealthError::InvalidInput(_)));

            let err = session
                .log_weight(12.0, "stone".into(), "2024-06-15".into(), None)
                .await
                .unwrap_err();
            assert!(matches!(err, PetHealthError::InvalidInput(_)));
        });
        assert!(session.treatments().is_empty());
    }

    #[test]
    fn test_unknown_treatment_maps_to_not_found() {
        let core = open_database_in_memory().unwrap();
        let session = core.open_pet("rex".into());
        let err = runtime()
            .block_on(session.delete_treatment("missing".into()))
            .unwrap_err();
        assert!(matches!(err, PetHealthError::NotFound(_)));
    }

    #[test]
    fn test_dashboard_and_calendar() {
        let core = open_database_in_memory().unwrap();
        let session = core.open_pet("rex".into());
        let today = models::today();

        runtime().block_on(async {
            session
                .add_vaccination(FfiNewVaccination {
                    vaccine_name: "Rabies".into(),
                    date_given: (today - chrono::Duration::days(350)).to_string(),
                    next_due_date: Some((today + chrono::Duration::days(15)).to_string()),
                    veterinarian: None,
                    batch_number: None,
                    notes: None,
                })
                .await
                .unwrap();
            session
                .log_weight(22.0, "lb".into(), today.to_string(), None)
                .await
                .unwrap();

            assert_eq!(session.vaccinations()[0].status, "due_soon");
            assert_eq!(session.weights()[0].unit, "lb");

            let events = session.upcoming_events(None);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].kind, "vaccination_due");

            let first = session.health_dashboard().await;
            assert_eq!(first.source, "calculated");
            assert_eq!(first.components.len(), 4);
            let second = session.health_dashboard().await;
            assert_eq!(second.source, "cached");
            assert_eq!(second.overall_score, first.overall_score);

            let fresh = session.recalculate_health_score().await.unwrap();
            assert_eq!(fresh.source, "calculated");

            let vaccination = session.vaccinations()[0].id.clone();
            session.delete_vaccination(vaccination).await.unwrap();
            let weight = session.weights()[0].id.clone();
            session.delete_weight(weight).await.unwrap();
            assert!(session.vaccinations().is_empty());
            assert!(session.weights().is_empty());
            assert!(session.upcoming_events(None).is_empty());
        });
    }

    #[test]
    fn test_transient_failures_are_retryable() {
        let offline = StoreError::Remote {
            operation: store::Operation::Delete,
            entity: "treatment",
            source: RemoteError::Network("offline".into()),
        };
        assert!(matches!(PetHealthError::from(offline), PetHealthError::Unavailable(m) if m.contains("delete treatment")));
        assert!(matches!(
            PetHealthError::from(RemoteError::Server("502".into())),
            PetHealthError::Unavailable(_)
        ));
        assert!(matches!(
            PetHealthError::from(RemoteError::PermissionDenied("rls".into())),
            PetHealthError::RemoteError(_)
        ));
    }

    #[test]
    fn test_upcoming_horizon_is_clamped() {
        let core = open_database_in_memory().unwrap();
        let session = core.open_pet("rex".into());
        let today = models::today();
        let vaccination = |name: &str, due_in: i64| FfiNewVaccination {
            vaccine_name: name.into(),
            date_given: today.to_string(),
            next_due_date: Some((today + chrono::Duration::days(due_in)).to_string()),
            veterinarian: None,
            batch_number: None,
            notes: None,
        };

        runtime().block_on(async {
            session.add_vaccination(vaccination("Rabies", MAX_HORIZON_DAYS)).await.unwrap();
            session.add_vaccination(vaccination("Lepto", MAX_HORIZON_DAYS + 1)).await.unwrap();
        });

        let events = session.upcoming_events(Some(i64::MAX));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Rabies booster due");
        assert!(session.upcoming_events(Some(i64::MIN)).is_empty());
    }

    #[test]
    fn test_open_database_persists_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.db").to_string_lossy().into_owned();
        let today = models::today().to_string();

        {
            let session = open_database(path.clone()).unwrap().open_pet("rex".into());
            runtime().block_on(session.log_weight(9.5, "kg".into(), today, None)).unwrap();
        }

        let session = open_database(path).unwrap().open_pet("rex".into());
        runtime().block_on(session.load()).unwrap();
        assert_eq!(session.weights().len(), 1);
    }
}
