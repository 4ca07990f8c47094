//! Health score: categorization, local scoring and the dashboard aggregator.

mod aggregator;
mod category;
mod dashboard;
mod scoring;

pub use aggregator::*;
pub use category::*;
pub use dashboard::*;
pub use scoring::*;
