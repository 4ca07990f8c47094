//! The record contract shared by every entity type a store can mirror.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Prefix carried by ids of records that exist only locally.
pub const TEMP_ID_PREFIX: &str = "temp-";

static TEMP_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a temporary id for an optimistic record.
///
/// Format: `temp-<unix millis>-<sequence>`. The sequence keeps two records
/// created within the same millisecond distinct.
pub fn temporary_id(now: DateTime<Utc>) -> String {
    let seq = TEMP_ID_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
    format!("{}{}-{}", TEMP_ID_PREFIX, now.timestamp_millis(), seq)
}

/// Check whether an id was generated locally and never confirmed.
pub fn is_temporary_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// The calendar date used for every derived-field evaluation (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Activity predicate for anything with an optional end date.
///
/// A record is active iff it has no end date or the end date is strictly
/// after `today`. Optimistic construction and server-row mapping both go
/// through this function.
pub fn is_active_on(end_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    end_date.map_or(true, |end| end > today)
}

/// A row-equivalent domain record bound to one pet.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Creation payload: domain fields only, no id, timestamps or derived fields.
    type Input: Clone + fmt::Debug + Serialize + Send + Sync + 'static;
    /// Partial update: `None` leaves a field untouched.
    type Patch: Clone + fmt::Debug + Default + Serialize + Send + Sync + 'static;

    /// Server-side table name.
    const TABLE: &'static str;
    /// Human-readable singular name, used in error messages.
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn pet_id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Build a record from its creation input, without derived fields.
    fn from_input(id: String, pet_id: &str, input: &Self::Input, now: DateTime<Utc>) -> Self;

    /// Merge a patch into the record, touching only the fields it names.
    fn apply_patch(&mut self, patch: &Self::Patch, now: DateTime<Utc>);

    /// Recompute derived fields as of `today`.
    fn refresh_derived(&mut self, _today: NaiveDate) {}

    /// Domain ordering of the mirror (e.g. newest start date first).
    fn cmp_order(&self, other: &Self) -> Ordering;

    /// Build a record with derived fields already computed.
    fn build(id: String, pet_id: &str, input: &Self::Input, now: DateTime<Utc>) -> Self {
        let mut record = Self::from_input(id, pet_id, input, now);
        record.refresh_derived(now.date_naive());
        record
    }

    /// Apply a patch and recompute derived fields.
    fn patched(&mut self, patch: &Self::Patch, now: DateTime<Utc>) {
        self.apply_patch(patch, now);
        self.refresh_derived(now.date_naive());
    }

    /// Whether this record still carries a locally generated id.
    fn is_temporary(&self) -> bool {
        is_temporary_id(self.id())
    }
}

/// Total order used by the local mirror: domain key, then newest
/// `created_at`, then id.
pub fn mirror_order<E: Entity>(a: &E, b: &E) -> Ordering {
    a.cmp_order(b)
        .then_with(|| b.created_at().cmp(&a.created_at()))
        .then_with(|| a.id().cmp(b.id()))
}

/// Descending order for optional dates, undated records last.
pub(crate) fn cmp_optional_date_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Apply a double-option patch field to a nullable value.
pub(crate) fn merge_nullable<T: Clone>(target: &mut Option<T>, patch: &Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value.clone();
    }
}

/// Apply a single-option patch field to a required value.
pub(crate) fn merge_required<T: Clone>(target: &mut T, patch: &Option<T>) {
    if let Some(value) = patch {
        *target = value.clone();
    }
}
