//! Domain models for pet health records.

mod condition;
mod entity;
mod health;
mod medication;
mod treatment;
mod vaccination;
mod visit;
mod weight;

pub use condition::*;
pub use entity::*;
pub use health::*;
pub use medication::*;
pub use treatment::*;
pub use vaccination::*;
pub use visit::*;
pub use weight::*;
