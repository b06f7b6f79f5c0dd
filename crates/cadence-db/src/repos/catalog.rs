//! Course catalog repository: courses and their per-day task templates.
//!
//! The authoring system owns these rows; the engine only reads them. The
//! upserts exist so operators and tests can seed a catalog.

use chrono::Utc;

use cadence_core::entities::{Course, TaskTemplate};
use cadence_core::ids::PREFIX_TEMPLATE;

use crate::error::DatabaseError;
use crate::helpers::{get_day, get_opt_string, parse_datetime};
use crate::service::CadenceService;

const COURSE_COLS: &str = "id, title, description, created_at";
const TEMPLATE_COLS: &str = "id, course_id, day, title, description, exercise, test";

fn row_to_course(row: &libsql::Row) -> Result<Course, DatabaseError> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_template(row: &libsql::Row) -> Result<TaskTemplate, DatabaseError> {
    Ok(TaskTemplate {
        id: row.get(0)?,
        course_id: row.get(1)?,
        day: get_day(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        exercise: get_opt_string(row, 5)?,
        test: get_opt_string(row, 6)?,
    })
}

impl CadenceService {
    /// Create a course, or update its title and description if it exists.
    pub async fn upsert_course(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Course, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO courses (id, title, description, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET title = excluded.title, description = excluded.description",
                libsql::params![id, title, description, Utc::now().to_rfc3339()],
            )
            .await?;

        self.get_course(id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_course(&self, id: &str) -> Result<Option<Course>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {COURSE_COLS} FROM courses WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_course(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {COURSE_COLS} FROM courses ORDER BY id"), ())
            .await?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next().await? {
            courses.push(row_to_course(&row)?);
        }
        Ok(courses)
    }

    /// Create or replace the template for `(course_id, day)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for day 0, or a libSQL error if the
    /// course does not exist.
    pub async fn upsert_task_template(
        &self,
        course_id: &str,
        day: u32,
        title: &str,
        description: &str,
        exercise: Option<&str>,
        test: Option<&str>,
    ) -> Result<TaskTemplate, DatabaseError> {
        if day == 0 {
            return Err(DatabaseError::InvalidState(
                "task days are numbered from 1".to_string(),
            ));
        }
        let id = self.db().generate_id(PREFIX_TEMPLATE).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO task_templates ({TEMPLATE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(course_id, day) DO UPDATE SET
                        title = excluded.title,
                        description = excluded.description,
                        exercise = excluded.exercise,
                        test = excluded.test"
                ),
                libsql::params![id.as_str(), course_id, day, title, description, exercise, test],
            )
            .await?;

        self.get_task_template(course_id, day)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    pub async fn get_task_template(
        &self,
        course_id: &str,
        day: u32,
    ) -> Result<Option<TaskTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TEMPLATE_COLS} FROM task_templates WHERE course_id = ?1 AND day = ?2"),
                libsql::params![course_id, day],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_template(&row)?)),
            None => Ok(None),
        }
    }

    /// All templates for a course, ordered by day.
    pub async fn get_course_tasks(&self, course_id: &str) -> Result<Vec<TaskTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TEMPLATE_COLS} FROM task_templates WHERE course_id = ?1 ORDER BY day"),
                [course_id],
            )
            .await?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next().await? {
            templates.push(row_to_template(&row)?);
        }
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_course, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn upsert_course_updates_in_place() {
        let svc = test_service().await;
        let first = svc.upsert_course("c1", "Old", None).await.unwrap();
        let second = svc.upsert_course("c1", "New", Some("desc")).await.unwrap();

        assert_eq!(second.title, "New");
        assert_eq!(second.description.as_deref(), Some("desc"));
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(svc.list_courses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn course_tasks_are_ordered_by_day() {
        let svc = test_service().await;
        svc.upsert_course("c1", "Course", None).await.unwrap();
        for day in [3, 1, 2] {
            svc.upsert_task_template("c1", day, &format!("Day {day}"), "", None, None)
                .await
                .unwrap();
        }
        let days: Vec<u32> = svc
            .get_course_tasks("c1")
            .await
            .unwrap()
            .iter()
            .map(|t| t.day)
            .collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn template_upsert_replaces_content() {
        let svc = test_service().await;
        seed_course(&svc, "c1", 2).await;
        let updated = svc
            .upsert_task_template("c1", 2, "Traits", "Write a trait", Some("impl Display"), Some("cargo test"))
            .await
            .unwrap();

        assert_eq!(updated.title, "Traits");
        assert_eq!(updated.exercise.as_deref(), Some("impl Display"));
        assert_eq!(svc.get_course_tasks("c1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn template_requires_existing_course() {
        let svc = test_service().await;
        let result = svc
            .upsert_task_template("missing", 1, "Day 1", "", None, None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn template_day_zero_rejected() {
        let svc = test_service().await;
        svc.upsert_course("c1", "Course", None).await.unwrap();
        let result = svc.upsert_task_template("c1", 0, "Day 0", "", None, None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn unknown_course_is_none() {
        let svc = test_service().await;
        assert!(svc.get_course("nope").await.unwrap().is_none());
        assert!(svc.get_course_tasks("nope").await.unwrap().is_empty());
    }
}
