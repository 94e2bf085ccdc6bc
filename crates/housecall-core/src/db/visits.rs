//! Saved-visit database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult, MAX_SAVED_VISITS};
use crate::models::VisitRecord;

/// List-view projection of a saved visit.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitSummary {
    /// Row address for load/delete
    pub visit_id: String,
    pub patient_name: String,
    pub saved_at: String,
}

impl Database {
    /// Persist a visit snapshot, assigning a fresh visit id.
    ///
    /// Every save mints a new id, so re-saving a loaded record never collides
    /// with the row it came from. Oldest rows beyond the cap are pruned.
    pub fn save_visit(&self, record: &mut VisitRecord) -> DbResult<String> {
        record.visit_id = uuid::Uuid::new_v4().to_string();
        let saved_at = chrono::Utc::now().to_rfc3339();
        let snapshot = serde_json::to_string(record)?;

        self.conn.execute(
            r#"
            INSERT INTO saved_visits (visit_id, patient_name, saved_at, record)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![record.visit_id, record.patient_name, saved_at, snapshot],
        )?;
        self.prune_visits()?;
        Ok(record.visit_id.clone())
    }

    /// List saved visits, most recent first.
    pub fn list_visits(&self) -> DbResult<Vec<VisitSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT visit_id, patient_name, saved_at
            FROM saved_visits
            ORDER BY saved_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(VisitSummary {
                visit_id: row.get(0)?,
                patient_name: row.get(1)?,
                saved_at: row.get(2)?,
            })
        })?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?);
        }
        Ok(visits)
    }

    /// Load a saved visit for a new consultation.
    ///
    /// The returned record has its visit id cleared; the stored row keeps its
    /// id as the list address.
    pub fn load_visit(&self, visit_id: &str) -> DbResult<Option<VisitRecord>> {
        let snapshot: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM saved_visits WHERE visit_id = ?",
                [visit_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(snapshot) = snapshot else {
            return Ok(None);
        };
        let mut record: VisitRecord = serde_json::from_str(&snapshot)?;
        record.clear_visit_id();
        Ok(Some(record))
    }

    /// Delete a saved visit.
    pub fn delete_visit(&self, visit_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM saved_visits WHERE visit_id = ?", [visit_id])?;
        Ok(rows_affected > 0)
    }

    fn prune_visits(&self) -> DbResult<()> {
        self.conn.execute(
            r#"
            DELETE FROM saved_visits WHERE visit_id NOT IN (
                SELECT visit_id FROM saved_visits
                ORDER BY saved_at DESC, rowid DESC
                LIMIT ?1
            )
            "#,
            params![MAX_SAVED_VISITS as i64],
        )?;
        Ok(())
    }
}
