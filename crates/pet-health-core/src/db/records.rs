//! Entity record database operations.
//!
//! Generic over [`Entity`]; the table comes from `E::TABLE`.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Entity;

impl Database {
    /// Insert a new record.
    pub fn insert_record<E: Entity>(&self, record: &E) -> DbResult<()> {
        let payload = serde_json::to_string(record)?;
        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, pet_id, payload, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                E::TABLE
            ),
            params![
                record.id(),
                record.pet_id(),
                payload,
                super::timestamp(record.created_at()),
                super::timestamp(chrono::Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing record. Returns false if the id is unknown.
    pub fn update_record<E: Entity>(&self, record: &E) -> DbResult<bool> {
        let payload = serde_json::to_string(record)?;
        let rows_affected = self.conn.execute(
            &format!(
                "UPDATE {} SET pet_id = ?2, payload = ?3, updated_at = ?4 WHERE id = ?1",
                E::TABLE
            ),
            params![
                record.id(),
                record.pet_id(),
                payload,
                super::timestamp(chrono::Utc::now()),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a record by id.
    pub fn get_record<E: Entity>(&self, id: &str) -> DbResult<Option<E>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT payload FROM {} WHERE id = ?", E::TABLE),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(Into::into)
    }

    /// List all records for a pet, newest first.
    pub fn list_records<E: Entity>(&self, pet_id: &str) -> DbResult<Vec<E>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT payload FROM {} WHERE pet_id = ? ORDER BY created_at DESC, id",
            E::TABLE
        ))?;

        let rows = stmt.query_map([pet_id], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for payload in rows {
            records.push(serde_json::from_str(&payload?)?);
        }
        Ok(records)
    }

    /// Delete a record. Returns false if the id is unknown.
    pub fn delete_record<E: Entity>(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?", E::TABLE), [id])?;
        Ok(rows_affected > 0)
    }

    /// Count records for a pet.
    pub fn count_records<E: Entity>(&self, pet_id: &str) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE pet_id = ?", E::TABLE),
            [pet_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
