//! Application repository: approved-application facts from the identity service.

use chrono::{DateTime, Utc};

use cadence_core::entities::Application;
use cadence_core::enums::ApplicationStatus;
use cadence_core::ids::PREFIX_APPLICATION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::CadenceService;

const SELECT_COLS: &str = "id, user_id, course_id, status, approved_at, created_at";

fn row_to_application(row: &libsql::Row) -> Result<Application, DatabaseError> {
    Ok(Application {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        approved_at: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl CadenceService {
    /// Record an application fact as delivered by the identity service.
    pub async fn record_application(
        &self,
        user_id: &str,
        course_id: &str,
        status: ApplicationStatus,
        approved_at: Option<DateTime<Utc>>,
    ) -> Result<Application, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_APPLICATION).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO applications ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    user_id,
                    course_id,
                    status.as_str(),
                    approved_at.map(|t| t.to_rfc3339()),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Application {
            id,
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            status,
            approved_at,
            created_at: now,
        })
    }

    /// The most recent approved application for a (user, course) pair.
    pub async fn get_approved_application(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Application>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM applications
                     WHERE user_id = ?1 AND course_id = ?2 AND status = 'approved'
                     ORDER BY COALESCE(approved_at, created_at) DESC LIMIT 1"
                ),
                [user_id, course_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_application(&row)?)),
            None => Ok(None),
        }
    }

    /// The most recent approved application for a user, whatever the course.
    ///
    /// This is the user's course selection for APIs keyed only by user.
    pub async fn get_approved_application_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Application>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM applications
                     WHERE user_id = ?1 AND status = 'approved'
                     ORDER BY COALESCE(approved_at, created_at) DESC LIMIT 1"
                ),
                [user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_application(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_service, utc};

    #[tokio::test]
    async fn approved_application_is_found() {
        let svc = test_service().await;
        svc.record_application("u1", "c1", ApplicationStatus::Approved, Some(utc("2024-01-01T00:00:00Z")))
            .await
            .unwrap();

        let app = svc.get_approved_application("u1", "c1").await.unwrap().unwrap();
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.anchor_instant(), utc("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn pending_application_is_ignored() {
        let svc = test_service().await;
        svc.record_application("u1", "c1", ApplicationStatus::Pending, None)
            .await
            .unwrap();
        assert!(svc.get_approved_application("u1", "c1").await.unwrap().is_none());
        assert!(svc.get_approved_application_for_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_approval_wins_for_user() {
        let svc = test_service().await;
        svc.record_application("u1", "old", ApplicationStatus::Approved, Some(utc("2023-01-01T00:00:00Z")))
            .await
            .unwrap();
        svc.record_application("u1", "new", ApplicationStatus::Approved, Some(utc("2024-01-01T00:00:00Z")))
            .await
            .unwrap();

        let app = svc.get_approved_application_for_user("u1").await.unwrap().unwrap();
        assert_eq!(app.course_id, "new");
    }

    #[tokio::test]
    async fn missing_approval_falls_back_to_creation() {
        let svc = test_service().await;
        let app = svc
            .record_application("u1", "c1", ApplicationStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(app.anchor_instant(), app.created_at);
    }
}
