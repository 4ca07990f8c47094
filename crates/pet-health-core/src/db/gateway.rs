//! Gateway traits over the local database.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{Database, DbError};
use crate::gateway::{EntityGateway, RemoteError, RemoteResult, ScoreGateway};
use crate::health::{score_pet, ScoringInputs};
use crate::models::{
    today, Condition, Entity, HealthScoreRecord, RawHealthScore, Vaccination, VetVisit, WeightEntry,
};

impl From<DbError> for RemoteError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(id) => RemoteError::NotFound(id),
            DbError::Constraint(msg) => RemoteError::Validation(msg),
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RemoteError::Validation(msg.unwrap_or_else(|| err.to_string()))
            }
            DbError::Json(e) => RemoteError::Decode(e.to_string()),
            DbError::Timestamp(e) => RemoteError::Decode(e.to_string()),
            other => RemoteError::Server(other.to_string()),
        }
    }
}

/// Serves the gateway traits from a local SQLite database.
///
/// Assigns UUIDs and timestamps the way the hosted backend would, and
/// computes `calculate_health_score` in-process.
#[derive(Clone)]
pub struct SqliteGateway {
    db: Arc<Mutex<Database>>,
}

impl SqliteGateway {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// In-memory database (for testing).
    pub fn open_in_memory() -> RemoteResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Shared handle to the underlying database.
    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }

    fn lock(&self) -> RemoteResult<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| RemoteError::Server(format!("Lock poisoned: {}", e)))
    }

    fn scoring_snapshot(
        &self,
        pet_id: &str,
    ) -> RemoteResult<(Vec<Vaccination>, Vec<VetVisit>, Vec<WeightEntry>, Vec<Condition>)> {
        let db = self.lock()?;
        Ok((
            db.list_records(pet_id)?,
            db.list_records(pet_id)?,
            db.list_records(pet_id)?,
            db.list_records(pet_id)?,
        ))
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for SqliteGateway {
    async fn list(&self, pet_id: &str) -> RemoteResult<Vec<E>> {
        let db = self.lock()?;
        let today = today();
        let mut records: Vec<E> = db.list_records(pet_id)?;
        for record in &mut records {
            record.refresh_derived(today);
        }
        Ok(records)
    }

    async fn create(&self, pet_id: &str, input: &E::Input) -> RemoteResult<E> {
        let record = E::build(uuid::Uuid::new_v4().to_string(), pet_id, input, Utc::now());
        self.lock()?.insert_record(&record)?;
        debug!(table = E::TABLE, id = record.id(), pet_id, "inserted record");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: &E::Patch) -> RemoteResult<E> {
        let db = self.lock()?;
        let mut record: E = db
            .get_record(id)?
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        record.patched(patch, Utc::now());
        if !db.update_record(&record)? {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(record)
    }

    async fn delete(&self, id: &str) -> RemoteResult<()> {
        if self.lock()?.delete_record::<E>(id)? {
            Ok(())
        } else {
            Err(RemoteError::NotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl ScoreGateway for SqliteGateway {
    async fn latest_score(&self, pet_id: &str) -> RemoteResult<Option<HealthScoreRecord>> {
        Ok(self.lock()?.latest_score(pet_id)?)
    }

    async fn calculate_health_score(&self, pet_id: &str) -> RemoteResult<RawHealthScore> {
        let (vaccinations, visits, weights, conditions) = self.scoring_snapshot(pet_id)?;
        Ok(score_pet(
            &ScoringInputs {
                vaccinations: &vaccinations,
                visits: &visits,
                weights: &weights,
                conditions: &conditions,
            },
            today(),
        ))
    }

    async fn save_score(&self, pet_id: &str, raw: &RawHealthScore) -> RemoteResult<HealthScoreRecord> {
        let record = HealthScoreRecord::from_raw(
            uuid::Uuid::new_v4().to_string(),
            pet_id,
            raw.clone(),
            Utc::now(),
        );
        self.lock()?.insert_score(&record)?;
        Ok(record)
    }
}
