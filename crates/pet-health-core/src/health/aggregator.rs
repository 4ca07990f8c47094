//! Cached health score lookup and dashboard assembly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{HealthDashboard, ScoreSource};
use crate::config::HealthConfig;
use crate::gateway::{RemoteResult, ScoreGateway};

/// Produces the health dashboard for a pet.
///
/// Reuses the latest score row while it is inside the freshness window,
/// otherwise runs the remote calculation and persists the result.
pub struct HealthScoreAggregator<G: ?Sized> {
    gateway: Arc<G>,
    config: HealthConfig,
}

impl<G: ScoreGateway + ?Sized> HealthScoreAggregator<G> {
    pub fn new(gateway: Arc<G>, config: HealthConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Dashboard from a fresh cached row, or from a new calculation.
    pub async fn compute(&self, pet_id: &str) -> RemoteResult<HealthDashboard> {
        if let Some(latest) = self.gateway.latest_score(pet_id).await? {
            if latest.is_fresh(Utc::now(), self.config.freshness_window()) {
                debug!(pet_id, score_id = %latest.id, "reusing cached health score");
                return Ok(HealthDashboard::from_record(
                    &latest,
                    ScoreSource::Cached,
                    &self.config.thresholds,
                ));
            }
        }
        self.recalculate(pet_id).await
    }

    /// Run the calculation regardless of cache state.
    pub async fn recalculate(&self, pet_id: &str) -> RemoteResult<HealthDashboard> {
        let raw = self.gateway.calculate_health_score(pet_id).await?;
        let record = self.gateway.save_score(pet_id, &raw).await?;
        info!(
            pet_id,
            overall_score = record.overall_score,
            "calculated health score"
        );
        Ok(HealthDashboard::from_record(
            &record,
            ScoreSource::Calculated,
            &self.config.thresholds,
        ))
    }

    /// Like [`compute`](Self::compute), but never fails: a zeroed FAIR
    /// dashboard stands in when scoring is unavailable.
    pub async fn compute_or_default(&self, pet_id: &str) -> HealthDashboard {
        match self.compute(pet_id).await {
            Ok(dashboard) => dashboard,
            Err(e) => {
                warn!(pet_id, error = %e, "health score unavailable, using default dashboard");
                HealthDashboard::fallback(pet_id)
            }
        }
    }
}
