//! SQLite schema definition.

/// Complete database schema for housecall.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Saved Visits (bounded, most-recent-first)
-- ============================================================================

CREATE TABLE IF NOT EXISTS saved_visits (
    visit_id TEXT PRIMARY KEY,
    patient_name TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now')),
    record TEXT NOT NULL                          -- JSON VisitRecord snapshot
);

CREATE INDEX IF NOT EXISTS idx_visits_saved_at ON saved_visits(saved_at);

-- ============================================================================
-- Daily Vitals (patient-entered, bounded)
-- ============================================================================

CREATE TABLE IF NOT EXISTS daily_vitals (
    vital_id TEXT PRIMARY KEY,
    recorded_at TEXT NOT NULL,                    -- display timestamp
    blood_pressure TEXT NOT NULL DEFAULT '',
    temperature TEXT NOT NULL DEFAULT '',
    spo2 TEXT NOT NULL DEFAULT '',
    heart_rate TEXT NOT NULL DEFAULT '',
    rbs TEXT NOT NULL DEFAULT '',
    weight TEXT NOT NULL DEFAULT '',
    waist TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_vitals_created_at ON daily_vitals(created_at);

-- ============================================================================
-- Patient Identity (single row, default-on-missing)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient_identity (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    name TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    relative_name TEXT NOT NULL DEFAULT '',
    relative_phone TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT OR IGNORE INTO patient_identity (id) VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_identity_row_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patient_identity", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }
}
