//! Entity store: optimistic mutations reconciled against a gateway.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::mirror::{LocalMirror, MutationState, Operation};
use super::optimistic::OptimisticUpdate;
use crate::gateway::{EntityGateway, RemoteError};
use crate::models::{temporary_id, Entity};

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Failed to {operation} {entity}: {source}")]
    Remote {
        operation: Operation,
        entity: &'static str,
        #[source]
        source: RemoteError,
    },

    #[error("Unknown {entity}: {id}")]
    UnknownRecord { entity: &'static str, id: String },
}

impl StoreError {
    fn remote<E: Entity>(operation: Operation, source: RemoteError) -> Self {
        StoreError::Remote {
            operation,
            entity: E::LABEL,
            source,
        }
    }

    /// The underlying gateway error, if any.
    pub fn remote_error(&self) -> Option<&RemoteError> {
        match self {
            StoreError::Remote { source, .. } => Some(source),
            StoreError::UnknownRecord { .. } => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Local mirror of one pet's records of type `E`, kept in step with a
/// gateway.
///
/// Mutations show up in the mirror before the remote call resolves. On
/// failure the mirror returns to exactly its pre-mutation records; on
/// success it is refetched from the gateway. Mutations are serialized in
/// call order, so each one snapshots the settled result of the previous.
pub struct EntityStore<E: Entity, G: ?Sized> {
    pet_id: String,
    gateway: Arc<G>,
    mirror: watch::Sender<LocalMirror<E>>,
    sequencer: Mutex<()>,
}

impl<E: Entity, G: EntityGateway<E> + ?Sized> EntityStore<E, G> {
    pub fn new(pet_id: impl Into<String>, gateway: Arc<G>) -> Self {
        let (mirror, _) = watch::channel(LocalMirror::new());
        Self {
            pet_id: pet_id.into(),
            gateway,
            mirror,
            sequencer: Mutex::new(()),
        }
    }

    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    /// Receiver that observes every mirror change.
    pub fn subscribe(&self) -> watch::Receiver<LocalMirror<E>> {
        self.mirror.subscribe()
    }

    /// Copy of the current mirror.
    pub fn mirror(&self) -> LocalMirror<E> {
        self.mirror.borrow().clone()
    }

    pub fn records(&self) -> Vec<E> {
        self.mirror.borrow().records().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<E> {
        self.mirror.borrow().get(id).cloned()
    }

    pub fn version(&self) -> u64 {
        self.mirror.borrow().version()
    }

    pub fn is_loaded(&self) -> bool {
        self.mirror.borrow().is_loaded()
    }

    /// Whether an abandoned mutation left the mirror possibly behind the
    /// server. The next mutation refetches before applying.
    pub fn needs_refresh(&self) -> bool {
        self.mirror.borrow().needs_refresh()
    }

    pub fn last_mutation(&self) -> MutationState {
        self.mirror.borrow().last_mutation().clone()
    }

    /// Replace the mirror with the gateway's listing.
    ///
    /// On failure the mirror is left as it was.
    pub async fn refresh(&self) -> StoreResult<()> {
        let _turn = self.sequencer.lock().await;
        let records = self
            .gateway
            .list(&self.pet_id)
            .await
            .map_err(|e| StoreError::remote::<E>(Operation::Load, e))?;
        debug!(table = E::TABLE, pet_id = %self.pet_id, count = records.len(), "loaded records");
        self.mirror.send_modify(|m| m.replace_all(records));
        Ok(())
    }

    /// Show the new record under a temporary id, then persist it.
    ///
    /// Returns the server's copy.
    pub async fn create(&self, input: E::Input) -> StoreResult<E> {
        let _turn = self.sequencer.lock().await;
        self.catch_up().await;
        let now = Utc::now();
        let temp_id = temporary_id(now);
        let optimistic = E::build(temp_id.clone(), &self.pet_id, &input, now);

        let pending = OptimisticUpdate::apply(&self.mirror, Operation::Create, &temp_id, |m| {
            m.insert(optimistic)
        });

        match self.gateway.create(&self.pet_id, &input).await {
            Ok(created) => {
                self.mirror
                    .send_modify(|m| m.replace(&temp_id, created.clone()));
                self.resync().await;
                pending.confirm(created.id());
                info!(table = E::TABLE, id = created.id(), "created record");
                Ok(created)
            }
            Err(e) => {
                warn!(table = E::TABLE, error = %e, "create failed, rolling back");
                pending.rollback(e.clone());
                Err(StoreError::remote::<E>(Operation::Create, e))
            }
        }
    }

    /// Merge `patch` into the record locally, then persist it.
    pub async fn update(&self, id: &str, patch: E::Patch) -> StoreResult<E> {
        let _turn = self.sequencer.lock().await;
        self.catch_up().await;
        self.ensure_known(id)?;
        let now = Utc::now();

        let pending = OptimisticUpdate::apply(&self.mirror, Operation::Update, id, |m| {
            m.update_with(id, |record| record.patched(&patch, now));
        });

        match self.gateway.update(id, &patch).await {
            Ok(updated) => {
                self.mirror.send_modify(|m| m.insert(updated.clone()));
                self.resync().await;
                pending.confirm(id);
                info!(table = E::TABLE, id, "updated record");
                Ok(updated)
            }
            Err(e) => {
                warn!(table = E::TABLE, id, error = %e, "update failed, rolling back");
                pending.rollback(e.clone());
                Err(StoreError::remote::<E>(Operation::Update, e))
            }
        }
    }

    /// Remove the record locally, then delete it remotely.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let _turn = self.sequencer.lock().await;
        self.catch_up().await;
        self.ensure_known(id)?;

        let pending = OptimisticUpdate::apply(&self.mirror, Operation::Delete, id, |m| {
            m.remove(id);
        });

        match self.gateway.delete(id).await {
            Ok(()) => {
                self.resync().await;
                pending.confirm(id);
                info!(table = E::TABLE, id, "deleted record");
                Ok(())
            }
            Err(e) => {
                warn!(table = E::TABLE, id, error = %e, "delete failed, rolling back");
                pending.rollback(e.clone());
                Err(StoreError::remote::<E>(Operation::Delete, e))
            }
        }
    }

    fn ensure_known(&self, id: &str) -> StoreResult<()> {
        if self.mirror.borrow().contains(id) {
            Ok(())
        } else {
            Err(StoreError::UnknownRecord {
                entity: E::LABEL,
                id: id.to_string(),
            })
        }
    }

    /// Refetch first if an abandoned mutation may have landed remotely, so
    /// the next snapshot starts from the server's records.
    async fn catch_up(&self) {
        if self.needs_refresh() {
            debug!(table = E::TABLE, pet_id = %self.pet_id, "refetching after abandoned mutation");
            self.resync().await;
        }
    }

    /// Refetch after a confirmed mutation. A failure here leaves the
    /// optimistic result in place; the next refresh corrects it.
    async fn resync(&self) {
        match self.gateway.list(&self.pet_id).await {
            Ok(records) => self.mirror.send_modify(|m| m.replace_all(records)),
            Err(e) => warn!(
                table = E::TABLE,
                pet_id = %self.pet_id,
                error = %e,
                "refetch after mutation failed"
            ),
        }
    }
}
