//! Daily-vital database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult, MAX_DAILY_VITALS};
use crate::models::{DailyVital, VitalReadings};

impl Database {
    /// Insert a vitals entry, pruning the oldest beyond the cap.
    pub fn insert_vital(&self, vital: &DailyVital) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO daily_vitals (
                vital_id, recorded_at, blood_pressure, temperature,
                spo2, heart_rate, rbs, weight, waist
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                vital.id,
                vital.recorded_at,
                vital.readings.blood_pressure,
                vital.readings.temperature,
                vital.readings.spo2,
                vital.readings.heart_rate,
                vital.readings.rbs,
                vital.readings.weight,
                vital.readings.waist,
            ],
        )?;
        self.prune_vitals()?;
        Ok(())
    }

    /// Replace the readings of an existing entry. The id never changes.
    pub fn update_vital(&self, vital: &DailyVital) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE daily_vitals SET
                recorded_at = ?2,
                blood_pressure = ?3,
                temperature = ?4,
                spo2 = ?5,
                heart_rate = ?6,
                rbs = ?7,
                weight = ?8,
                waist = ?9
            WHERE vital_id = ?1
            "#,
            params![
                vital.id,
                vital.recorded_at,
                vital.readings.blood_pressure,
                vital.readings.temperature,
                vital.readings.spo2,
                vital.readings.heart_rate,
                vital.readings.rbs,
                vital.readings.weight,
                vital.readings.waist,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a vitals entry by id.
    pub fn get_vital(&self, vital_id: &str) -> DbResult<Option<DailyVital>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT vital_id, recorded_at, blood_pressure, temperature,
                       spo2, heart_rate, rbs, weight, waist
                FROM daily_vitals
                WHERE vital_id = ?
                "#,
                [vital_id],
                map_vital_row,
            )
            .optional()?)
    }

    /// List vitals entries, most recent first.
    pub fn list_vitals(&self) -> DbResult<Vec<DailyVital>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT vital_id, recorded_at, blood_pressure, temperature,
                   spo2, heart_rate, rbs, weight, waist
            FROM daily_vitals
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], map_vital_row)?;
        let mut vitals = Vec::new();
        for row in rows {
            vitals.push(row?);
        }
        Ok(vitals)
    }

    /// Delete a vitals entry.
    pub fn delete_vital(&self, vital_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM daily_vitals WHERE vital_id = ?", [vital_id])?;
        Ok(rows_affected > 0)
    }

    fn prune_vitals(&self) -> DbResult<()> {
        self.conn.execute(
            r#"
            DELETE FROM daily_vitals WHERE vital_id NOT IN (
                SELECT vital_id FROM daily_vitals
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?1
            )
            "#,
            params![MAX_DAILY_VITALS as i64],
        )?;
        Ok(())
    }
}

fn map_vital_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyVital> {
    Ok(DailyVital {
        id: row.get(0)?,
        recorded_at: row.get(1)?,
        readings: VitalReadings {
            blood_pressure: row.get(2)?,
            temperature: row.get(3)?,
            spo2: row.get(4)?,
            heart_rate: row.get(5)?,
            rbs: row.get(6)?,
            weight: row.get(7)?,
            waist: row.get(8)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_vital(bp: &str) -> DailyVital {
        DailyVital::new(VitalReadings {
            blood_pressure: bp.into(),
            temperature: "98.4".into(),
            spo2: "98".into(),
            heart_rate: "72".into(),
            rbs: "110".into(),
            weight: "70".into(),
            waist: "34".into(),
        })
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        let vital = make_vital("120/80");
        db.insert_vital(&vital).unwrap();

        let stored = db.get_vital(&vital.id).unwrap().unwrap();
        assert_eq!(stored, vital);
    }

    #[test]
    fn test_update_keeps_id() {
        let db = Database::open_in_memory().unwrap();
        let mut vital = make_vital("120/80");
        db.insert_vital(&vital).unwrap();

        vital.readings.blood_pressure = "130/85".into();
        assert!(db.update_vital(&vital).unwrap());

        let stored = db.get_vital(&vital.id).unwrap().unwrap();
        assert_eq!(stored.id, vital.id);
        assert_eq!(stored.readings.blood_pressure, "130/85");
    }

    #[test]
    fn test_update_missing_returns_false() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.update_vital(&make_vital("120/80")).unwrap());
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let vital = make_vital("120/80");
        db.insert_vital(&vital).unwrap();

        assert!(db.delete_vital(&vital.id).unwrap());
        assert!(db.get_vital(&vital.id).unwrap().is_none());
    }

    #[test]
    fn test_prune_caps_list() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..(MAX_DAILY_VITALS + 3) {
            db.insert_vital(&make_vital(&format!("120/{i}"))).unwrap();
        }
        assert_eq!(db.list_vitals().unwrap().len(), MAX_DAILY_VITALS);
    }
}
