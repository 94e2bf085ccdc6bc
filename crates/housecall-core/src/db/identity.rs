//! Patient-identity persistence (single row).

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::PatientIdentity;

impl Database {
    /// Load the stored identity; defaults when nothing has been written yet.
    pub fn load_identity(&self) -> DbResult<PatientIdentity> {
        Ok(self.conn.query_row(
            r#"
            SELECT name, phone, email, relative_name, relative_phone
            FROM patient_identity
            WHERE id = 1
            "#,
            [],
            |row| {
                Ok(PatientIdentity {
                    name: row.get(0)?,
                    phone: row.get(1)?,
                    email: row.get(2)?,
                    relative_name: row.get(3)?,
                    relative_phone: row.get(4)?,
                })
            },
        )?)
    }

    /// Write the identity. Called on every change.
    pub fn save_identity(&self, identity: &PatientIdentity) -> DbResult<()> {
        self.conn.execute(
            r#"
            UPDATE patient_identity SET
                name = ?1,
                phone = ?2,
                email = ?3,
                relative_name = ?4,
                relative_phone = ?5,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
            params![
                identity.name,
                identity.phone,
                identity.email,
                identity.relative_name,
                identity.relative_phone,
            ],
        )?;
        Ok(())
    }
}
