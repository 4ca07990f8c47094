//! Apply a change locally, then confirm or undo it.

use tokio::sync::watch;
use tracing::warn;

use super::mirror::{LocalMirror, MirrorSnapshot, MutationState, Operation};
use crate::gateway::RemoteError;
use crate::models::Entity;

/// An optimistic change that has been applied to a mirror but not yet
/// settled.
///
/// Settle it with [`confirm`](Self::confirm) or [`rollback`](Self::rollback).
/// Dropping it unsettled (e.g. when the owning future is cancelled) restores
/// the snapshot, so a half-finished mutation never lingers in the mirror.
/// The remote call may still have landed, so the mirror is also flagged
/// with [`LocalMirror::needs_refresh`] until the next full listing.
pub struct OptimisticUpdate<'a, E: Entity> {
    mirror: &'a watch::Sender<LocalMirror<E>>,
    snapshot: Option<MirrorSnapshot<E>>,
    operation: Operation,
    id: String,
}

impl<'a, E: Entity> OptimisticUpdate<'a, E> {
    /// Snapshot the mirror, then run `change` against it and publish.
    pub fn apply(
        mirror: &'a watch::Sender<LocalMirror<E>>,
        operation: Operation,
        id: impl Into<String>,
        change: impl FnOnce(&mut LocalMirror<E>),
    ) -> Self {
        let id = id.into();
        let snapshot = mirror.borrow().snapshot();
        mirror.send_modify(|m| {
            change(m);
            m.set_last_mutation(MutationState::Applying {
                operation,
                id: id.clone(),
            });
        });
        Self {
            mirror,
            snapshot: Some(snapshot),
            operation,
            id,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Id of the record being changed (temporary for creates).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Keep the change. `id` is the record's settled id, which differs from
    /// the optimistic one after a create.
    pub fn confirm(mut self, id: &str) {
        self.snapshot = None;
        let operation = self.operation;
        self.mirror.send_modify(|m| {
            m.set_last_mutation(MutationState::Confirmed {
                operation,
                id: id.to_string(),
            });
        });
    }

    /// Restore the pre-change records exactly.
    pub fn rollback(mut self, error: RemoteError) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        let operation = self.operation;
        let id = self.id.clone();
        self.mirror.send_modify(|m| {
            m.restore(snapshot);
            m.set_last_mutation(MutationState::RolledBack {
                operation,
                id,
                error,
            });
        });
    }
}

impl<E: Entity> Drop for OptimisticUpdate<'_, E> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!(
                table = E::TABLE,
                operation = %self.operation,
                id = %self.id,
                "optimistic change abandoned before settling, restoring snapshot"
            );
            self.mirror.send_modify(|m| {
                m.restore(snapshot);
                m.mark_needs_refresh();
                m.set_last_mutation(MutationState::Idle);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTreatment, Treatment, TreatmentKind};
    use chrono::Utc;

    fn seeded() -> watch::Sender<LocalMirror<Treatment>> {
        let now = Utc::now();
        let mut mirror = LocalMirror::new();
        mirror.replace_all(vec![Treatment::build(
            "t1".into(),
            "pet-1",
            &NewTreatment::new("Bravecto", TreatmentKind::FleaTick, now.date_naive()),
            now,
        )]);
        watch::channel(mirror).0
    }

    #[test]
    fn test_rollback_restores_records() {
        let tx = seeded();
        let before = tx.borrow().records().to_vec();

        let pending = OptimisticUpdate::apply(&tx, Operation::Delete, "t1", |m| {
            m.remove("t1");
        });
        assert!(tx.borrow().is_empty());
        assert!(tx.borrow().last_mutation().is_in_flight());

        pending.rollback(RemoteError::Network("offline".into()));
        assert_eq!(tx.borrow().records(), before.as_slice());
        assert!(matches!(
            tx.borrow().last_mutation(),
            MutationState::RolledBack { operation: Operation::Delete, .. }
        ));
    }

    #[test]
    fn test_confirm_keeps_change() {
        let tx = seeded();
        let pending = OptimisticUpdate::apply(&tx, Operation::Delete, "t1", |m| {
            m.remove("t1");
        });
        pending.confirm("t1");

        assert!(tx.borrow().is_empty());
        assert_eq!(
            tx.borrow().last_mutation(),
            &MutationState::Confirmed {
                operation: Operation::Delete,
                id: "t1".into()
            }
        );
    }

    #[test]
    fn test_drop_unsettled_restores() {
        let tx = seeded();
        {
            let _pending = OptimisticUpdate::apply(&tx, Operation::Delete, "t1", |m| {
                m.remove("t1");
            });
        }
        assert_eq!(tx.borrow().len(), 1);
        assert_eq!(tx.borrow().last_mutation(), &MutationState::Idle);
        assert!(tx.borrow().needs_refresh());

        tx.send_modify(|m| m.replace_all(Vec::new()));
        assert!(!tx.borrow().needs_refresh());
    }

    #[test]
    fn test_settled_changes_do_not_flag_refresh() {
        let tx = seeded();
        OptimisticUpdate::apply(&tx, Operation::Delete, "t1", |m| {
            m.remove("t1");
        })
        .rollback(RemoteError::Network("offline".into()));
        assert!(!tx.borrow().needs_refresh());
    }
}
