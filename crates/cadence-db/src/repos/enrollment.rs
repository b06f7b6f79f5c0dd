//! Enrollment repository: the per-(user, course) anchor of a journey.

use chrono::{DateTime, Utc};

use cadence_core::entities::Enrollment;
use cadence_core::enums::EnrollmentStatus;
use cadence_core::ids::PREFIX_ENROLLMENT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::CadenceService;

const SELECT_COLS: &str =
    "id, user_id, course_id, registered_at, timezone, status, created_at, updated_at";

fn row_to_enrollment(row: &libsql::Row) -> Result<Enrollment, DatabaseError> {
    Ok(Enrollment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        registered_at: parse_datetime(&row.get::<String>(3)?)?,
        timezone: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl CadenceService {
    pub async fn get_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM enrollments WHERE user_id = ?1 AND course_id = ?2"),
                [user_id, course_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_enrollment(&row)?)),
            None => Ok(None),
        }
    }

    /// Create the enrollment for `(user_id, course_id)` unless one exists.
    ///
    /// Concurrent first reads race on the unique key; whichever insert lands
    /// first defines the anchor and every caller gets that row back.
    pub async fn insert_enrollment_if_absent(
        &self,
        user_id: &str,
        course_id: &str,
        registered_at: DateTime<Utc>,
        timezone: &str,
    ) -> Result<Enrollment, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ENROLLMENT).await?;
        let now = Utc::now().to_rfc3339();

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO enrollments ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(user_id, course_id) DO NOTHING"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    course_id,
                    registered_at.to_rfc3339(),
                    timezone,
                    EnrollmentStatus::Active.as_str(),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;
        if inserted > 0 {
            tracing::info!(user_id, course_id, enrollment_id = %id, %registered_at, "enrollment created");
        }

        self.get_enrollment(user_id, course_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Enrollments in `status`, oldest first.
    pub async fn list_enrollments_by_status(
        &self,
        status: EnrollmentStatus,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM enrollments WHERE status = ?1 ORDER BY created_at, id"),
                [status.as_str()],
            )
            .await?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next().await? {
            enrollments.push(row_to_enrollment(&row)?);
        }
        Ok(enrollments)
    }

    pub async fn list_enrollments_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM enrollments WHERE user_id = ?1 ORDER BY created_at, id"),
                [user_id],
            )
            .await?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next().await? {
            enrollments.push(row_to_enrollment(&row)?);
        }
        Ok(enrollments)
    }

    /// Overwrite the stored status. Transition rules are checked by callers.
    pub async fn update_enrollment_status(
        &self,
        enrollment_id: &str,
        status: EnrollmentStatus,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE enrollments SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), Utc::now().to_rfc3339(), enrollment_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    pub async fn update_enrollment_timezone(
        &self,
        enrollment_id: &str,
        timezone: &str,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE enrollments SET timezone = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![timezone, Utc::now().to_rfc3339(), enrollment_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
