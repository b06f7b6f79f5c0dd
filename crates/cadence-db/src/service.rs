//! Service layer hosting every repository and engine operation.
//!
//! `CadenceService` wraps `CadenceDb` (raw database access) together with the
//! defaults needed by the engine. All repo methods are implemented as
//! `impl CadenceService` blocks under `repos/` and `engine/`.

use cadence_config::CadenceConfig;
use chrono_tz::Tz;

use crate::CadenceDb;
use crate::error::DatabaseError;

/// Orchestrates persistence and unlock decisions for all enrollments.
pub struct CadenceService {
    db: CadenceDb,
    default_timezone: Tz,
}

impl CadenceService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `default_timezone` - Timezone given to lazily created enrollments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, default_timezone: Tz) -> Result<Self, DatabaseError> {
        let db = CadenceDb::open_local(db_path).await?;
        Ok(Self::from_db(db, default_timezone))
    }

    /// Open the service described by a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the configured default timezone
    /// is invalid, or `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &CadenceConfig) -> Result<Self, DatabaseError> {
        let tz = config
            .enrollment
            .timezone()
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        Self::new_local(&config.database.path, tz).await
    }

    /// Create from an existing `CadenceDb` (for testing).
    #[must_use]
    pub const fn from_db(db: CadenceDb, default_timezone: Tz) -> Self {
        Self {
            db,
            default_timezone,
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CadenceDb {
        &self.db
    }

    #[must_use]
    pub const fn default_timezone(&self) -> Tz {
        self.default_timezone
    }
}
