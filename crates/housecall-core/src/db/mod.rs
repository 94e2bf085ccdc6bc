//! Local persistence for the housecall system.

mod identity;
mod schema;
mod visits;
mod vitals;

pub use schema::*;
#[allow(unused_imports)]
pub use identity::*;
#[allow(unused_imports)]
pub use visits::*;
#[allow(unused_imports)]
pub use vitals::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Saved visits kept after pruning, most recent first.
pub const MAX_SAVED_VISITS: usize = 20;

/// Daily-vital entries kept after pruning, most recent first.
pub const MAX_DAILY_VITALS: usize = 60;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
