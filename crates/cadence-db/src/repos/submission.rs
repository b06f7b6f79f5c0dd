//! Submission repository. Rows are written once and never mutated.

use chrono::{DateTime, Utc};

use cadence_core::entities::Submission;
use cadence_core::ids::PREFIX_SUBMISSION;

use crate::error::DatabaseError;
use crate::helpers::{get_day, get_opt_string, parse_datetime};
use crate::service::CadenceService;

const SELECT_COLS: &str = "id, user_id, course_id, day, description, file_ref, submitted_at";

fn row_to_submission(row: &libsql::Row) -> Result<Submission, DatabaseError> {
    Ok(Submission {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        day: get_day(row, 3)?,
        description: row.get(4)?,
        file_ref: get_opt_string(row, 5)?,
        submitted_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl CadenceService {
    /// Insert a submission. Returns `None` if one already exists for the day.
    pub async fn insert_submission(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        description: &str,
        file_ref: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<Submission>, DatabaseError> {
        let id = self.db().generate_id(PREFIX_SUBMISSION).await?;

        let inserted = self
            .db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO submissions ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(user_id, course_id, day) DO NOTHING"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    course_id,
                    day,
                    description,
                    file_ref,
                    submitted_at.to_rfc3339()
                ],
            )
            .await?;
        if inserted == 0 {
            return Ok(None);
        }

        Ok(Some(Submission {
            id,
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            day,
            description: description.to_string(),
            file_ref: file_ref.map(str::to_string),
            submitted_at,
        }))
    }

    pub async fn get_submission(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
    ) -> Result<Option<Submission>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM submissions WHERE user_id = ?1 AND course_id = ?2 AND day = ?3"
                ),
                libsql::params![user_id, course_id, day],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_submission(&row)?)),
            None => Ok(None),
        }
    }

    /// All submissions of a user for a course, ordered by day.
    pub async fn list_submissions(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<Submission>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM submissions WHERE user_id = ?1 AND course_id = ?2 ORDER BY day"
                ),
                [user_id, course_id],
            )
            .await?;
        let mut submissions = Vec::new();
        while let Some(row) = rows.next().await? {
            submissions.push(row_to_submission(&row)?);
        }
        Ok(submissions)
    }
}
