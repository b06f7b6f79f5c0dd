//! Task view projection.
//!
//! Builds the per-day status of a user's course. A day that the evaluator
//! opens fresh is written to the ledger (`completion_implicit`) before it is
//! reported, so users never wait for the next reconciliation pass.

use chrono::{DateTime, Utc};

use cadence_core::entities::Enrollment;
use cadence_core::enums::{TaskDayStatus, UnlockReason};
use cadence_core::responses::{
    CourseSummary, TaskCounts, TaskView, TaskViewResponse, TodayTaskResponse,
};
use cadence_core::rules::UnlockRules;

use super::CourseCatalog;
use crate::error::UnlockError;
use crate::service::CadenceService;

/// Projection of one enrollment at one instant.
#[derive(Debug, Clone)]
pub struct Projection {
    pub enrollment: Enrollment,
    pub catalog: CourseCatalog,
    pub journey_day: u32,
    pub tasks: Vec<TaskView>,
}

impl Projection {
    /// First day that has not been submitted yet.
    #[must_use]
    pub fn first_open(&self) -> Option<&TaskView> {
        self.tasks
            .iter()
            .find(|t| t.status != TaskDayStatus::Completed)
    }
}

impl CadenceService {
    /// Per-day status of `(user_id, course_id)` as of now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::project_tasks_at`].
    pub async fn project_tasks(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<TaskView>, UnlockError> {
        self.project_tasks_at(user_id, course_id, Utc::now()).await
    }

    /// Per-day status of `(user_id, course_id)` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `NotEnrolled`, `CourseNotFound`, or a storage error.
    pub async fn project_tasks_at(
        &self,
        user_id: &str,
        course_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<TaskView>, UnlockError> {
        let enrollment = self.resolve_enrollment(user_id, course_id).await?;
        Ok(self.project_enrollment(enrollment, now).await?.tasks)
    }

    /// Project an already-resolved enrollment.
    ///
    /// Lazy ledger writes happen only for active enrollments; paused or
    /// finished enrollments are projected read-only.
    ///
    /// # Errors
    ///
    /// Returns `CourseNotFound`, an invalid-timezone error, or a storage error.
    pub async fn project_enrollment(
        &self,
        enrollment: Enrollment,
        now: DateTime<Utc>,
    ) -> Result<Projection, UnlockError> {
        let catalog = self.load_catalog(&enrollment.course_id).await?;
        let history = self.load_history(&enrollment).await?;
        let rules = UnlockRules::new(&enrollment, &history.submissions, &history.unlocks, now)?;

        let mut tasks = Vec::with_capacity(catalog.templates.len());
        for template in &catalog.templates {
            let mut view = TaskView {
                day: template.day,
                title: template.title.clone(),
                description: template.description.clone(),
                exercise: template.exercise.clone(),
                test: template.test.clone(),
                status: TaskDayStatus::Locked,
                can_access: false,
                unlock_date: None,
                unlocked_at: None,
                unlocked_by: None,
                submitted_at: None,
            };
            if let Some(record) = rules.unlock_record(template.day) {
                view.unlocked_at = Some(record.unlocked_at);
                view.unlocked_by = Some(record.unlocked_by);
            }

            if let Some(submission) = rules.submission(template.day) {
                view.status = TaskDayStatus::Completed;
                view.submitted_at = Some(submission.submitted_at);
                tasks.push(view);
                continue;
            }

            let decision = rules.should_unlock(template.day);
            if decision.unlock {
                view.status = TaskDayStatus::Current;
                view.can_access = enrollment.is_active();
                if decision.needs_record() && enrollment.is_active() {
                    let outcome = self
                        .record_unlock_at(
                            &enrollment.user_id,
                            &enrollment.course_id,
                            template.day,
                            UnlockReason::CompletionImplicit,
                            now,
                        )
                        .await?;
                    view.unlocked_at = Some(outcome.record().unlocked_at);
                    view.unlocked_by = Some(outcome.record().unlocked_by);
                }
            } else {
                view.unlock_date = decision.unlock_date();
            }
            tasks.push(view);
        }

        Ok(Projection {
            journey_day: rules.journey_day(),
            enrollment,
            catalog,
            tasks,
        })
    }

    /// Full task view of the user's selected course as of now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::tasks_for_user_at`].
    pub async fn tasks_for_user(&self, user_id: &str) -> Result<TaskViewResponse, UnlockError> {
        self.tasks_for_user_at(user_id, Utc::now()).await
    }

    /// Full task view of the user's selected course.
    ///
    /// # Errors
    ///
    /// Returns `NotEnrolled` when the user has no approved application or
    /// enrollment, `CourseNotFound`, or a storage error.
    pub async fn tasks_for_user_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TaskViewResponse, UnlockError> {
        let enrollment = self.resolve_user_enrollment(user_id).await?;
        let projection = self.project_enrollment(enrollment, now).await?;

        let counts = TaskCounts::from_views(&projection.tasks);
        let course = &projection.catalog.course;
        Ok(TaskViewResponse {
            user_id: user_id.to_string(),
            course: CourseSummary {
                id: course.id.clone(),
                title: course.title.clone(),
                description: course.description.clone(),
                total_days: counts.total,
            },
            enrollment_status: projection.enrollment.status,
            timezone: projection.enrollment.timezone.clone(),
            journey_day: projection.journey_day,
            progress_percent: counts.progress_percent(),
            counts,
            tasks: projection.tasks,
        })
    }

    /// The user's current day as of now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::today_task_at`].
    pub async fn today_task(&self, user_id: &str) -> Result<TodayTaskResponse, UnlockError> {
        self.today_task_at(user_id, Utc::now()).await
    }

    /// The lowest day not yet submitted, with whether it can be submitted now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::tasks_for_user_at`]; an empty or finished course is
    /// reported as `NotAvailable`, not as an error.
    pub async fn today_task_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<TodayTaskResponse, UnlockError> {
        let enrollment = self.resolve_user_enrollment(user_id).await?;
        let active = enrollment.is_active();
        let status = enrollment.status;
        let projection = self.project_enrollment(enrollment, now).await?;

        if projection.tasks.is_empty() {
            return Ok(TodayTaskResponse::NotAvailable {
                reason: "course has no tasks".to_string(),
            });
        }
        let Some(task) = projection.first_open().cloned() else {
            return Ok(TodayTaskResponse::NotAvailable {
                reason: "all tasks completed".to_string(),
            });
        };
        if !active {
            return Ok(TodayTaskResponse::NotAvailable {
                reason: format!("enrollment is {status}"),
            });
        }

        Ok(TodayTaskResponse::Available {
            day: task.day,
            can_submit: task.can_access,
            unlock_date: task.unlock_date.clone(),
            task,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{COURSE, USER, seed_enrollable, test_service, utc};
    use cadence_core::enums::EnrollmentStatus;
    use pretty_assertions::assert_eq;

    fn statuses(tasks: &[TaskView]) -> Vec<TaskDayStatus> {
        tasks.iter().map(|t| t.status).collect()
    }

    #[tokio::test]
    async fn fresh_enrollment_has_day_one_current() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;

        let tasks = svc
            .project_tasks_at(USER, COURSE, utc("2024-01-05T12:00:00+05:30"))
            .await
            .unwrap();
        assert_eq!(
            statuses(&tasks),
            vec![TaskDayStatus::Current, TaskDayStatus::Locked, TaskDayStatus::Locked]
        );
        assert!(tasks[0].can_access);
        assert_eq!(tasks[0].unlocked_at, None);
        assert_eq!(tasks[1].unlock_date.as_deref(), Some("complete previous task"));
    }

    #[tokio::test]
    async fn cooldown_shows_next_date_then_opens_lazily() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();

        let before = svc
            .project_tasks_at(USER, COURSE, utc("2024-01-01T23:59:00+05:30"))
            .await
            .unwrap();
        assert_eq!(before[0].status, TaskDayStatus::Completed);
        assert!(!before[0].can_access);
        assert_eq!(before[1].status, TaskDayStatus::Locked);
        assert_eq!(before[1].unlock_date.as_deref(), Some("2024-01-02"));
        assert!(svc.list_unlocks(USER, COURSE).await.unwrap().is_empty());

        let after = svc
            .project_tasks_at(USER, COURSE, utc("2024-01-02T00:01:00+05:30"))
            .await
            .unwrap();
        assert_eq!(after[1].status, TaskDayStatus::Current);
        assert_eq!(after[1].unlocked_by, Some(UnlockReason::CompletionImplicit));

        let ledger = svc.list_unlocks(USER, COURSE).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].day, 2);
    }

    #[tokio::test]
    async fn repeated_views_write_one_record() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 2).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();

        let now = utc("2024-01-03T09:00:00+05:30");
        let first = svc.project_tasks_at(USER, COURSE, now).await.unwrap();
        let second = svc.project_tasks_at(USER, COURSE, now).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.list_unlocks(USER, COURSE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn paused_enrollment_is_read_only() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 2).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();
        svc.transition_enrollment(USER, COURSE, EnrollmentStatus::Paused)
            .await
            .unwrap();

        let tasks = svc
            .project_tasks_at(USER, COURSE, utc("2024-01-03T09:00:00+05:30"))
            .await
            .unwrap();
        assert!(svc.list_unlocks(USER, COURSE).await.unwrap().is_empty());
        assert_eq!(tasks[1].status, TaskDayStatus::Current);
        assert!(!tasks[1].can_access);
    }

    #[tokio::test]
    async fn task_view_response_counts() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 4).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();

        let response = svc
            .tasks_for_user_at(USER, utc("2024-01-02T08:00:00+05:30"))
            .await
            .unwrap();
        assert_eq!(response.journey_day, 2);
        assert_eq!(response.course.total_days, 4);
        assert_eq!(
            response.counts,
            TaskCounts {
                total: 4,
                completed: 1,
                current: 1,
                locked: 2
            }
        );
        assert_eq!(response.progress_percent, 25);
        assert_eq!(response.timezone, "Asia/Kolkata");
    }

    #[tokio::test]
    async fn today_task_reports_lowest_open_day() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 2).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();

        let today = svc
            .today_task_at(USER, utc("2024-01-01T20:00:00+05:30"))
            .await
            .unwrap();
        match today {
            TodayTaskResponse::Available {
                day,
                can_submit,
                unlock_date,
                ..
            } => {
                assert_eq!(day, 2);
                assert!(!can_submit);
                assert_eq!(unlock_date.as_deref(), Some("2024-01-02"));
            }
            other => panic!("expected available, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn today_task_after_completion_is_not_available() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 1).await;
        svc.insert_submission(USER, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
            .await
            .unwrap();

        let today = svc
            .today_task_at(USER, utc("2024-01-02T10:00:00+05:30"))
            .await
            .unwrap();
        assert_eq!(
            today,
            TodayTaskResponse::NotAvailable {
                reason: "all tasks completed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unknown_user_is_not_enrolled() {
        let svc = test_service().await;
        let result = svc.tasks_for_user("nobody").await;
        assert!(matches!(result, Err(UnlockError::NotEnrolled { .. })));
    }
}
