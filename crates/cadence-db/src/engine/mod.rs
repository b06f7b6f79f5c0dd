//! Unlock engine operations.
//!
//! Every decision goes through [`cadence_core::rules::UnlockRules`]; the
//! modules here only load state, call the evaluator, and persist its outcome.

pub mod admin;
pub mod projector;
pub mod reconcile;
pub mod resolver;
pub mod submit;

use cadence_core::entities::{Course, Enrollment, Submission, TaskTemplate, UnlockRecord};

use crate::error::UnlockError;
use crate::service::CadenceService;

/// A course and its templates, ordered by day.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    pub course: Course,
    pub templates: Vec<TaskTemplate>,
}

impl CourseCatalog {
    #[must_use]
    pub fn template(&self, day: u32) -> Option<&TaskTemplate> {
        self.templates.iter().find(|t| t.day == day)
    }

    #[must_use]
    pub fn last_day(&self) -> Option<u32> {
        self.templates.last().map(|t| t.day)
    }
}

/// Submission and ledger history of one enrollment.
#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    pub submissions: Vec<Submission>,
    pub unlocks: Vec<UnlockRecord>,
}

impl CadenceService {
    /// Load a course together with its templates.
    ///
    /// # Errors
    ///
    /// Returns `UnlockError::CourseNotFound` if the catalog has no such course.
    pub async fn load_catalog(&self, course_id: &str) -> Result<CourseCatalog, UnlockError> {
        let course = self
            .get_course(course_id)
            .await?
            .ok_or_else(|| UnlockError::CourseNotFound(course_id.to_string()))?;
        let templates = self.get_course_tasks(course_id).await?;
        Ok(CourseCatalog { course, templates })
    }

    pub(crate) async fn load_history(&self, enrollment: &Enrollment) -> Result<History, UnlockError> {
        let submissions = self
            .list_submissions(&enrollment.user_id, &enrollment.course_id)
            .await?;
        let unlocks = self
            .list_unlocks(&enrollment.user_id, &enrollment.course_id)
            .await?;
        Ok(History {
            submissions,
            unlocks,
        })
    }
}
