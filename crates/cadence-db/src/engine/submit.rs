//! Submission acceptance.
//!
//! The evaluator is consulted again at write time, so a client holding a stale
//! "current" view cannot submit a day that has since become unavailable.

use chrono::{DateTime, Utc};

use cadence_core::clock;
use cadence_core::enums::{EnrollmentStatus, UnlockReason};
use cadence_core::responses::SubmitTaskResponse;
use cadence_core::rules::UnlockRules;

use crate::error::UnlockError;
use crate::service::CadenceService;

impl CadenceService {
    /// Accept the submission for `day` as of now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_task_at`].
    pub async fn submit_task(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        description: &str,
        file_ref: Option<&str>,
    ) -> Result<SubmitTaskResponse, UnlockError> {
        self.submit_task_at(user_id, course_id, day, description, file_ref, Utc::now())
            .await
    }

    /// Accept the submission for `day` if the evaluator allows it at `now`.
    ///
    /// Submitting the last day of the course completes the enrollment.
    ///
    /// # Errors
    ///
    /// - `EnrollmentInactive` if the enrollment is paused, completed, or dropped.
    /// - `CourseNotFound` / `TemplateNotFound` for missing catalog data.
    /// - `DuplicateSubmission` if the day was already submitted, including
    ///   when a concurrent submission wins the insert.
    /// - `TaskNotYetAvailable` with the evaluator's reason otherwise.
    pub async fn submit_task_at(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        description: &str,
        file_ref: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SubmitTaskResponse, UnlockError> {
        let enrollment = self.resolve_enrollment(user_id, course_id).await?;
        if !enrollment.is_active() {
            return Err(UnlockError::EnrollmentInactive {
                enrollment_id: enrollment.id,
                status: enrollment.status,
            });
        }

        let catalog = self.load_catalog(course_id).await?;
        if catalog.template(day).is_none() {
            return Err(UnlockError::TemplateNotFound {
                course_id: course_id.to_string(),
                day,
            });
        }

        let history = self.load_history(&enrollment).await?;
        let tz = enrollment.tz()?;
        let rules = UnlockRules::with_timezone(
            enrollment.registered_at,
            tz,
            &history.submissions,
            &history.unlocks,
            now,
        );

        if rules.submission(day).is_some() {
            return Err(UnlockError::DuplicateSubmission { day });
        }

        let decision = rules.should_unlock(day);
        if !decision.unlock {
            tracing::debug!(user_id, course_id, day, reason = %decision.reason, "submission rejected");
            return Err(UnlockError::TaskNotYetAvailable {
                day,
                reason: decision.reason.to_string(),
            });
        }
        if decision.needs_record() {
            self.record_unlock_at(user_id, course_id, day, UnlockReason::CompletionImplicit, now)
                .await?;
        }

        let submission = self
            .insert_submission(user_id, course_id, day, description, file_ref, now)
            .await?
            .ok_or(UnlockError::DuplicateSubmission { day })?;
        tracing::info!(user_id, course_id, day, submission_id = %submission.id, "task submitted");

        let course_completed = catalog
            .templates
            .iter()
            .all(|t| t.day == day || rules.submission(t.day).is_some());
        if course_completed {
            self.update_enrollment_status(&enrollment.id, EnrollmentStatus::Completed)
                .await?;
            tracing::info!(user_id, course_id, "course completed");
        }

        let next_unlock_at = catalog
            .template(day.saturating_add(1))
            .map(|_| clock::next_unlock_instant(now, tz));

        Ok(SubmitTaskResponse {
            submission,
            next_unlock_at,
            course_completed,
        })
    }
}
