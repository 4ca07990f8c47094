//! REST gateway for the hosted pet health backend.
//!
//! Implements the core's [`EntityGateway`](pet_health_core::EntityGateway)
//! and [`ScoreGateway`](pet_health_core::ScoreGateway) over a PostgREST-style
//! API: one table per entity under `/rest/v1/{table}`, filters as
//! `column=eq.value`, and the `calculate_health_score` procedure under
//! `/rest/v1/rpc/`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use pet_health_core::PetRecords;
//! use pet_health_remote::{RemoteConfig, RestGateway};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(RestGateway::new(RemoteConfig::from_env()?)?);
//! gateway.set_access_token(Some("user-jwt".into())).await;
//! let rex = PetRecords::new("rex", gateway);
//! rex.load_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;

pub use client::*;
pub use config::*;
