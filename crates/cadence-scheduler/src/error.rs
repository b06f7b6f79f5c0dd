//! Scheduler error types.

use cadence_config::ConfigError;
use cadence_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler is already running")]
    AlreadyRunning,

    #[error("Scheduler is not running")]
    NotRunning,

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pass could not list enrollments at all.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
