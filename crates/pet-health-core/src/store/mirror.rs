//! In-memory ordered copy of one pet's records.

use std::fmt;

use crate::gateway::RemoteError;
use crate::models::{mirror_order, Entity};

/// Remote operation a store performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

/// State of the most recent mutation.
///
/// `Idle → Applying → Confirmed | RolledBack`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    /// Optimistic change visible, remote call in flight
    Applying { operation: Operation, id: String },
    /// Remote call succeeded and the mirror was resynchronized
    Confirmed { operation: Operation, id: String },
    /// Remote call failed and the pre-mutation snapshot was restored
    RolledBack {
        operation: Operation,
        id: String,
        error: RemoteError,
    },
}

impl MutationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, MutationState::Applying { .. })
    }
}

/// Records as they were before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorSnapshot<E> {
    records: Vec<E>,
}

impl<E> MirrorSnapshot<E> {
    pub fn records(&self) -> &[E] {
        &self.records
    }
}

/// Ordered records plus change tracking.
///
/// Invariants: sorted by [`mirror_order`]; at most one record per id;
/// `version` increases on every change to the records.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMirror<E> {
    records: Vec<E>,
    version: u64,
    loaded: bool,
    needs_refresh: bool,
    last_mutation: MutationState,
}

impl<E> Default for LocalMirror<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            version: 0,
            loaded: false,
            needs_refresh: false,
            last_mutation: MutationState::Idle,
        }
    }
}

impl<E: Entity> LocalMirror<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Change counter, used as the memoization key for derived views.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether an initial fetch has populated the mirror.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Set when a mutation was abandoned after its remote call may have
    /// landed; cleared by the next full listing.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub fn last_mutation(&self) -> &MutationState {
        &self.last_mutation
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Records still waiting for a server id.
    pub fn temporary_records(&self) -> impl Iterator<Item = &E> {
        self.records.iter().filter(|r| r.is_temporary())
    }

    /// Replace everything with a fresh server listing.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn replace_all(&mut self, records: Vec<E>) {
        let mut unique: Vec<E> = Vec::with_capacity(records.len());
        for record in records {
            if !unique.iter().any(|r| r.id() == record.id()) {
                unique.push(record);
            }
        }
        unique.sort_by(mirror_order);
        self.records = unique;
        self.loaded = true;
        self.needs_refresh = false;
        self.bump();
    }

    /// Insert at the sorted position, replacing any record with the same id.
    pub fn insert(&mut self, record: E) {
        self.records.retain(|r| r.id() != record.id());
        let at = self
            .records
            .partition_point(|r| mirror_order(r, &record).is_lt());
        self.records.insert(at, record);
        self.bump();
    }

    /// Swap the record with `id` for `record` (which may carry a new id).
    pub fn replace(&mut self, id: &str, record: E) {
        self.records.retain(|r| r.id() != id);
        self.insert(record);
    }

    /// Mutate one record in place and restore ordering. Returns false if
    /// the id is unknown.
    pub fn update_with(&mut self, id: &str, f: impl FnOnce(&mut E)) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id() == id) else {
            return false;
        };
        f(record);
        self.records.sort_by(mirror_order);
        self.bump();
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        let removed = self.records.remove(index);
        self.bump();
        Some(removed)
    }

    pub fn snapshot(&self) -> MirrorSnapshot<E> {
        MirrorSnapshot {
            records: self.records.clone(),
        }
    }

    /// Put back the records captured by `snapshot`, exactly.
    pub fn restore(&mut self, snapshot: MirrorSnapshot<E>) {
        self.records = snapshot.records;
        self.bump();
    }

    pub(crate) fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub(crate) fn set_last_mutation(&mut self, state: MutationState) {
        self.last_mutation = state;
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}
