//! Error types for cadence-db.
//!
//! `DatabaseError` covers storage failures. `UnlockError` is the engine's
//! taxonomy surfaced to callers of the user-facing and admin operations.

use cadence_core::enums::EnrollmentStatus;
use cadence_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from unlock engine operations.
#[derive(Debug, Error)]
pub enum UnlockError {
    /// No enrollment exists and no approved application backs one.
    #[error("No active course for user {user_id}")]
    NotEnrolled { user_id: String },

    /// The evaluator rejected the day at write time.
    #[error("Day {day} is not yet available: {reason}")]
    TaskNotYetAvailable { day: u32, reason: String },

    /// A submission for this (user, course, day) already exists.
    #[error("Day {day} has already been submitted")]
    DuplicateSubmission { day: u32 },

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Course {course_id} has no task for day {day}")]
    TemplateNotFound { course_id: String, day: u32 },

    /// The enrollment is paused, completed, or dropped.
    #[error("Enrollment {enrollment_id} is {status}")]
    EnrollmentInactive {
        enrollment_id: String,
        status: EnrollmentStatus,
    },

    /// Day 1 is always open and never gets a ledger entry.
    #[error("Day {0} cannot be unlocked explicitly")]
    InvalidDay(u32),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl UnlockError {
    /// Storage failures are transient from the caller's point of view.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl From<libsql::Error> for UnlockError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(DatabaseError::LibSql(e))
    }
}
