//! Per-pet ownership of entity stores.

use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use tracing::debug;

use super::reconciler::{EntityStore, StoreResult};
use super::selectors::{upcoming_events, CalendarSources, UpcomingEvent};
use crate::gateway::EntityGateway;
use crate::models::{
    Allergy, Condition, Medication, Treatment, Vaccination, VetVisit, WeightEntry,
};

/// A gateway that serves every entity type.
pub trait RecordGateway:
    EntityGateway<Treatment>
    + EntityGateway<Vaccination>
    + EntityGateway<VetVisit>
    + EntityGateway<WeightEntry>
    + EntityGateway<Medication>
    + EntityGateway<Condition>
    + EntityGateway<Allergy>
{
}

impl<T> RecordGateway for T where
    T: EntityGateway<Treatment>
        + EntityGateway<Vaccination>
        + EntityGateway<VetVisit>
        + EntityGateway<WeightEntry>
        + EntityGateway<Medication>
        + EntityGateway<Condition>
        + EntityGateway<Allergy>
        + ?Sized
{
}

/// Every entity store for one pet.
///
/// Stores are built on first access. Dropping the scope drops them all;
/// nothing is shared with other pets.
pub struct PetRecords<G: ?Sized> {
    pet_id: String,
    gateway: Arc<G>,
    treatments: OnceLock<EntityStore<Treatment, G>>,
    vaccinations: OnceLock<EntityStore<Vaccination, G>>,
    visits: OnceLock<EntityStore<VetVisit, G>>,
    weights: OnceLock<EntityStore<WeightEntry, G>>,
    medications: OnceLock<EntityStore<Medication, G>>,
    conditions: OnceLock<EntityStore<Condition, G>>,
    allergies: OnceLock<EntityStore<Allergy, G>>,
}

impl<G: RecordGateway + ?Sized> PetRecords<G> {
    pub fn new(pet_id: impl Into<String>, gateway: Arc<G>) -> Self {
        Self {
            pet_id: pet_id.into(),
            gateway,
            treatments: OnceLock::new(),
            vaccinations: OnceLock::new(),
            visits: OnceLock::new(),
            weights: OnceLock::new(),
            medications: OnceLock::new(),
            conditions: OnceLock::new(),
            allergies: OnceLock::new(),
        }
    }

    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    pub fn treatments(&self) -> &EntityStore<Treatment, G> {
        self.treatments.get_or_init(|| self.store())
    }

    pub fn vaccinations(&self) -> &EntityStore<Vaccination, G> {
        self.vaccinations.get_or_init(|| self.store())
    }

    pub fn visits(&self) -> &EntityStore<VetVisit, G> {
        self.visits.get_or_init(|| self.store())
    }

    pub fn weights(&self) -> &EntityStore<WeightEntry, G> {
        self.weights.get_or_init(|| self.store())
    }

    pub fn medications(&self) -> &EntityStore<Medication, G> {
        self.medications.get_or_init(|| self.store())
    }

    pub fn conditions(&self) -> &EntityStore<Condition, G> {
        self.conditions.get_or_init(|| self.store())
    }

    pub fn allergies(&self) -> &EntityStore<Allergy, G> {
        self.allergies.get_or_init(|| self.store())
    }

    /// Fetch every store concurrently. Fails with the first error; stores
    /// that already loaded keep their records.
    pub async fn load_all(&self) -> StoreResult<()> {
        futures::try_join!(
            self.treatments().refresh(),
            self.vaccinations().refresh(),
            self.visits().refresh(),
            self.weights().refresh(),
            self.medications().refresh(),
            self.conditions().refresh(),
            self.allergies().refresh(),
        )?;
        debug!(pet_id = %self.pet_id, "loaded all records");
        Ok(())
    }

    /// Calendar of vaccination boosters, visit follow-ups and treatment
    /// end dates from the current mirrors.
    pub fn upcoming_events(&self, today: NaiveDate, horizon_days: i64) -> Vec<UpcomingEvent> {
        let vaccinations = self.vaccinations().records();
        let visits = self.visits().records();
        let treatments = self.treatments().records();
        upcoming_events(
            &CalendarSources {
                vaccinations: &vaccinations,
                visits: &visits,
                treatments: &treatments,
            },
            today,
            horizon_days,
        )
    }

    fn store<E>(&self) -> EntityStore<E, G>
    where
        E: crate::models::Entity,
        G: EntityGateway<E>,
    {
        EntityStore::new(self.pet_id.clone(), Arc::clone(&self.gateway))
    }
}

impl<G: ?Sized> Drop for PetRecords<G> {
    fn drop(&mut self) {
        debug!(pet_id = %self.pet_id, "dropping pet records");
    }
}
