//! Administrative operations on enrollments and the unlock ledger.

use chrono::{DateTime, Utc};

use cadence_core::clock;
use cadence_core::entities::Enrollment;
use cadence_core::enums::{EnrollmentStatus, UnlockReason};
use cadence_core::errors::CoreError;

use crate::error::{DatabaseError, UnlockError};
use crate::repos::unlock::UnlockOutcome;
use crate::service::CadenceService;

impl CadenceService {
    /// Open `day` for the user now, regardless of cooldown.
    ///
    /// # Errors
    ///
    /// Same as [`Self::manual_unlock_at`].
    pub async fn manual_unlock(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
    ) -> Result<UnlockOutcome, UnlockError> {
        self.manual_unlock_at(user_id, course_id, day, Utc::now())
            .await
    }

    /// Open `day` for the user regardless of cooldown or pacing.
    ///
    /// An existing record is left untouched and returned as `AlreadyUnlocked`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDay` for day 1, `NotEnrolled` without an enrollment,
    /// and `CourseNotFound` / `TemplateNotFound` for missing catalog data.
    pub async fn manual_unlock_at(
        &self,
        user_id: &str,
        course_id: &str,
        day: u32,
        now: DateTime<Utc>,
    ) -> Result<UnlockOutcome, UnlockError> {
        if day < 2 {
            return Err(UnlockError::InvalidDay(day));
        }
        self.resolve_enrollment(user_id, course_id).await?;
        let catalog = self.load_catalog(course_id).await?;
        if catalog.template(day).is_none() {
            return Err(UnlockError::TemplateNotFound {
                course_id: course_id.to_string(),
                day,
            });
        }

        let outcome = self
            .record_unlock_at(user_id, course_id, day, UnlockReason::ManualAdminOverride, now)
            .await?;
        Ok(outcome)
    }

    /// Move an enrollment to `next` if its state machine allows it.
    ///
    /// # Errors
    ///
    /// Returns `UnlockError::Core(CoreError::InvalidTransition)` for a
    /// disallowed move.
    pub async fn transition_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
        next: EnrollmentStatus,
    ) -> Result<Enrollment, UnlockError> {
        let enrollment = self.resolve_enrollment(user_id, course_id).await?;
        if !enrollment.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "enrollment".to_string(),
                id: enrollment.id,
                from: enrollment.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        self.update_enrollment_status(&enrollment.id, next).await?;
        tracing::info!(user_id, course_id, from = %enrollment.status, to = %next, "enrollment transitioned");
        self.reload_enrollment(user_id, course_id).await
    }

    /// Correct the timezone that anchors the user's day boundaries.
    ///
    /// # Errors
    ///
    /// Returns `UnlockError::Core(CoreError::UnknownTimezone)` for an invalid name.
    pub async fn set_enrollment_timezone(
        &self,
        user_id: &str,
        course_id: &str,
        timezone: &str,
    ) -> Result<Enrollment, UnlockError> {
        let tz = clock::parse_timezone(timezone)?;
        let enrollment = self.resolve_enrollment(user_id, course_id).await?;

        self.update_enrollment_timezone(&enrollment.id, tz.name())
            .await?;
        tracing::info!(user_id, course_id, from = %enrollment.timezone, to = tz.name(), "enrollment timezone changed");
        self.reload_enrollment(user_id, course_id).await
    }

    async fn reload_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Enrollment, UnlockError> {
        Ok(self
            .get_enrollment(user_id, course_id)
            .await?
            .ok_or(DatabaseError::NoResult)?)
    }
}
