//! # cadence-db
//!
//! libSQL persistence and unlock engine operations for Cadence.
//!
//! Holds every persisted record kind: courses and task templates, approved
//! applications, enrollments, submissions, the unlock ledger, and the history
//! of reconciliation passes. The engine operations (enrollment resolution,
//! task projection, submission acceptance, admin overrides, and per-enrollment
//! reconciliation) are implemented as `impl CadenceService` blocks on top.
//!
//! Uniqueness constraints in the schema are the concurrency control: every
//! writer uses `INSERT .. ON CONFLICT DO NOTHING` and reads the affected-row
//! count to tell a fresh write from a lost race.

pub mod engine;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Cadence state.
///
/// Wraps a libSQL database and connection.
pub struct CadenceDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CadenceDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Creates the parent directory if needed and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let cadence_db = Self { db, conn };
        cadence_db.run_migrations().await?;
        Ok(cadence_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"unl-a3f8b2c1d4e5f607"`.
    ///
    /// Uses `randomblob(8)` in SQL to produce 16-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(8)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
