//! Remote store contracts.
//!
//! A gateway performs CRUD for one entity type against the system of record
//! and owns no state. Gateways never retry; rollback and retry belong to the
//! store and the caller respectively.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Entity, HealthScoreRecord, RawHealthScore};

/// Any failure reported by a gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether the failure is transient and a retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Network(_) | RemoteError::Server(_))
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Decode(e.to_string())
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// CRUD against the remote table of one entity type.
#[async_trait]
pub trait EntityGateway<E: Entity>: Send + Sync {
    /// All records for a pet.
    async fn list(&self, pet_id: &str) -> RemoteResult<Vec<E>>;

    /// Persist a new record; returns the server copy with id and timestamps.
    async fn create(&self, pet_id: &str, input: &E::Input) -> RemoteResult<E>;

    /// Merge a patch into an existing record.
    async fn update(&self, id: &str, patch: &E::Patch) -> RemoteResult<E>;

    /// Remove a record. Deleting a missing id may succeed or fail.
    async fn delete(&self, id: &str) -> RemoteResult<()>;
}

/// Health score rows and the remote scoring procedure.
#[async_trait]
pub trait ScoreGateway: Send + Sync {
    /// Most recent score row for a pet.
    async fn latest_score(&self, pet_id: &str) -> RemoteResult<Option<HealthScoreRecord>>;

    /// Invoke `calculate_health_score` for a pet.
    async fn calculate_health_score(&self, pet_id: &str) -> RemoteResult<RawHealthScore>;

    /// Persist a calculated score as a new row.
    async fn save_score(&self, pet_id: &str, raw: &RawHealthScore) -> RemoteResult<HealthScoreRecord>;
}
