//! Optimistic entity stores.
//!
//! A store keeps a [`LocalMirror`] of one pet's records of a single type.
//! Mutations are applied to the mirror immediately, sent to an
//! [`EntityGateway`](crate::gateway::EntityGateway), and then either
//! confirmed by refetching or rolled back to the pre-mutation snapshot.

mod mirror;
mod optimistic;
mod reconciler;
mod scope;
pub mod selectors;

pub use mirror::*;
pub use optimistic::*;
pub use reconciler::*;
pub use scope::*;
pub use selectors::{DerivedView, UpcomingEvent, UpcomingEventKind, WeightTrend};
