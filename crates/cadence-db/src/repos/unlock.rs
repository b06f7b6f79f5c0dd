//! Unlock ledger: at most one record per (user, course, day).
//!
//! Three writers race here: lazy projection, reconciliation, and admin
//! override. The unique key decides the winner; losers read back the winning
//! row so every caller sees the same `unlocked_at` and `unlocked_by`.

use chrono::{DateTime, Utc};

use cadence_core::entities::UnlockRecord;
use cadence_core::enums::UnlockReason;
use cadence_core::ids::PREFIX_UNLOCK;

use crate::error::DatabaseError;
use crate::helpers::{get_day, parse_datetime, parse_enum};
use crate::service::CadenceService;

const SELECT_COLS: &str = "id, user_id, course_id, day, unlocked_at, unlocked_by";

fn row_to_unlock(row: &libsql::Row) -> Result<UnlockRecord, DatabaseError> {
    Ok(UnlockRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        day: get_day(row, 3)?,
        unlocked_at: parse_datetime(&row.get::<String>(4)?)?,
        unlocked_by: parse_enum(&row.get::<String>(5)?)?,
    })
}

/// Result of an idempotent ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// This call created the record.
    Recorded(UnlockRecord),
    /// A record already existed; it is returned unchanged.
    AlreadyUnlocked(UnlockRecord),
}

impl UnlockOutcome {
    #[must_use]
    pub const fn record(&self) -> &UnlockRecord {
        match self {
            Self::Recorded(r) | Self::AlreadyUnlocked(r) => r,
        }
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }

    #[must_use]
    pub fn into_record(self) -> UnlockRecord {
        match self {
            Self::Recorded(r) | Self::AlreadyUnlocked(r) => r,
        }
    }
}

impl CadenceService {
    /// Record an unlock stamped with the current time.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_unlock_at`].
    pub async fn record_unlock(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        reason: UnlockReason,
    ) -> Result<UnlockOutcome, DatabaseError> {
        self.record_unlock_at(user_id, course_id, day, reason, Utc::now())
            .await
    }

    /// Record an unlock at `unlocked_at` unless the day is already recorded.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for day 1, which is implicit and
    /// never written to the ledger.
    pub async fn record_unlock_at(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        reason: UnlockReason,
        unlocked_at: DateTime<Utc>,
    ) -> Result<UnlockOutcome, DatabaseError> {
        if day < 2 {
            return Err(DatabaseError::InvalidState(format!(
                "day {day} is never recorded in the unlock ledger"
            )));
        }
        let id = self.db().generate_id(PREFIX_UNLOCK).await?;

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO unlock_records ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(user_id, course_id, day) DO NOTHING"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    course_id,
                    day,
                    unlocked_at.to_rfc3339(),
                    reason.as_str()
                ],
            )
            .await?;

        if inserted > 0 {
            tracing::info!(user_id, course_id, day, %reason, "day unlocked");
            return Ok(UnlockOutcome::Recorded(UnlockRecord {
                id,
                user_id: user_id.to_string(),
                course_id: course_id.to_string(),
                day,
                unlocked_at,
                unlocked_by: reason,
            }));
        }

        let existing = self
            .get_unlock(user_id, course_id, day)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        tracing::debug!(user_id, course_id, day, existing = %existing.unlocked_by, "day already unlocked");
        Ok(UnlockOutcome::AlreadyUnlocked(existing))
    }

    pub async fn get_unlock(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
    ) -> Result<Option<UnlockRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM unlock_records WHERE user_id = ?1 AND course_id = ?2 AND day = ?3"
                ),
                libsql::params![user_id, course_id, day],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_unlock(&row)?)),
            None => Ok(None),
        }
    }

    /// All ledger entries of a user for a course, ordered by day.
    pub async fn list_unlocks(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<UnlockRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM unlock_records WHERE user_id = ?1 AND course_id = ?2 ORDER BY day"
                ),
                [user_id, course_id],
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_unlock(&row)?);
        }
        Ok(records)
    }
}
