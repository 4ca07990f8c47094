//! Health score database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::HealthScoreRecord;

/// Raw row before JSON/timestamp decoding.
struct ScoreRow {
    id: String,
    pet_id: String,
    overall_score: f64,
    vaccination_score: f64,
    preventive_care_score: f64,
    weight_score: f64,
    condition_score: f64,
    recommendations: String,
    calculated_at: String,
}

impl TryFrom<ScoreRow> for HealthScoreRecord {
    type Error = super::DbError;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        Ok(HealthScoreRecord {
            id: row.id,
            pet_id: row.pet_id,
            overall_score: row.overall_score,
            vaccination_score: row.vaccination_score,
            preventive_care_score: row.preventive_care_score,
            weight_score: row.weight_score,
            condition_score: row.condition_score,
            recommendations: serde_json::from_str(&row.recommendations)?,
            calculated_at: DateTime::parse_from_rfc3339(&row.calculated_at)?.with_timezone(&Utc),
        })
    }
}

impl Database {
    /// Append a score row.
    pub fn insert_score(&self, score: &HealthScoreRecord) -> DbResult<()> {
        let recommendations = serde_json::to_string(&score.recommendations)?;
        self.conn.execute(
            r#"
            INSERT INTO health_scores (
                id, pet_id, overall_score, vaccination_score, preventive_care_score,
                weight_score, condition_score, recommendations, calculated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                score.id,
                score.pet_id,
                score.overall_score,
                score.vaccination_score,
                score.preventive_care_score,
                score.weight_score,
                score.condition_score,
                recommendations,
                super::timestamp(score.calculated_at),
            ],
        )?;
        Ok(())
    }

    /// Most recent score row for a pet.
    pub fn latest_score(&self, pet_id: &str) -> DbResult<Option<HealthScoreRecord>> {
        self.conn
            .query_row(
                r#"
                SELECT id, pet_id, overall_score, vaccination_score, preventive_care_score,
                       weight_score, condition_score, recommendations, calculated_at
                FROM health_scores
                WHERE pet_id = ?
                ORDER BY calculated_at DESC
                LIMIT 1
                "#,
                [pet_id],
                |row| {
                    Ok(ScoreRow {
                        id: row.get(0)?,
                        pet_id: row.get(1)?,
                        overall_score: row.get(2)?,
                        vaccination_score: row.get(3)?,
                        preventive_care_score: row.get(4)?,
                        weight_score: row.get(5)?,
                        condition_score: row.get(6)?,
                        recommendations: row.get(7)?,
                        calculated_at: row.get(8)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn score(id: &str, overall: f64, calculated_at: DateTime<Utc>) -> HealthScoreRecord {
        HealthScoreRecord {
            id: id.into(),
            pet_id: "pet-1".into(),
            overall_score: overall,
            vaccination_score: 100.0,
            preventive_care_score: 60.0,
            weight_score: 70.0,
            condition_score: 100.0,
            recommendations: vec!["Schedule an annual wellness exam".into()],
            calculated_at,
        }
    }

    #[test]
    fn test_latest_score_picks_newest() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();

        assert!(db.latest_score("pet-1").unwrap().is_none());

        db.insert_score(&score("old", 55.0, now - Duration::days(3))).unwrap();
        db.insert_score(&score("new", 82.0, now - Duration::hours(1))).unwrap();

        let latest = db.latest_score("pet-1").unwrap().unwrap();
        assert_eq!(latest.id, "new");
        assert_eq!(latest.overall_score, 82.0);
        assert_eq!(latest.recommendations.len(), 1);
        assert!(db.latest_score("pet-2").unwrap().is_none());
    }
}
