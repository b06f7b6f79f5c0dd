//! Enrollment resolution.
//!
//! Enrollments are created lazily, the first time anything asks for one, from
//! the user's approved application. Creation is idempotent under races.

use cadence_core::entities::Enrollment;
use cadence_core::enums::EnrollmentStatus;

use crate::error::UnlockError;
use crate::service::CadenceService;

impl CadenceService {
    /// Find the enrollment for `(user_id, course_id)`, creating it from the
    /// approved application if this is the first time it is needed.
    ///
    /// The anchor is the application's approval instant (or its creation
    /// instant when approval time is unknown); the timezone is the service
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `UnlockError::NotEnrolled` when no enrollment exists and no
    /// approved application backs one.
    pub async fn resolve_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Enrollment, UnlockError> {
        if let Some(existing) = self.get_enrollment(user_id, course_id).await? {
            return Ok(existing);
        }

        let application = self
            .get_approved_application(user_id, course_id)
            .await?
            .ok_or_else(|| UnlockError::NotEnrolled {
                user_id: user_id.to_string(),
            })?;

        let enrollment = self
            .insert_enrollment_if_absent(
                user_id,
                course_id,
                application.anchor_instant(),
                self.default_timezone().name(),
            )
            .await?;
        Ok(enrollment)
    }

    /// Resolve the enrollment for the user's selected course.
    ///
    /// The selection is the course of the most recent approved application.
    /// Without one, the user's active enrollment (or latest enrollment) is used.
    ///
    /// # Errors
    ///
    /// Returns `UnlockError::NotEnrolled` if the user has neither.
    pub async fn resolve_user_enrollment(&self, user_id: &str) -> Result<Enrollment, UnlockError> {
        if let Some(application) = self.get_approved_application_for_user(user_id).await? {
            return self.resolve_enrollment(user_id, &application.course_id).await;
        }

        let mut enrollments = self.list_enrollments_for_user(user_id).await?;
        if let Some(pos) = enrollments
            .iter()
            .position(|e| e.status == EnrollmentStatus::Active)
        {
            return Ok(enrollments.swap_remove(pos));
        }
        enrollments.pop().ok_or_else(|| UnlockError::NotEnrolled {
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::UnlockError;
    use crate::test_support::{COURSE, USER, seed_enrollable, test_service, utc};
    use cadence_core::enums::ApplicationStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn creates_enrollment_from_approval() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;

        let enrollment = svc.resolve_enrollment(USER, COURSE).await.unwrap();
        assert_eq!(enrollment.registered_at, utc("2024-01-01T00:00:00+05:30"));
        assert_eq!(enrollment.timezone, "Asia/Kolkata");
        assert!(enrollment.is_active());
    }

    #[tokio::test]
    async fn second_resolve_returns_same_row() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;

        let first = svc.resolve_enrollment(USER, COURSE).await.unwrap();
        let second = svc.resolve_enrollment(USER, COURSE).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_first_resolve_agrees() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;

        let (a, b) = tokio::join!(
            svc.resolve_enrollment(USER, COURSE),
            svc.resolve_enrollment(USER, COURSE)
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);
    }

    #[tokio::test]
    async fn missing_approval_is_not_enrolled() {
        let svc = test_service().await;
        svc.record_application(USER, COURSE, ApplicationStatus::Rejected, None)
            .await
            .unwrap();

        let result = svc.resolve_enrollment(USER, COURSE).await;
        assert!(matches!(result, Err(UnlockError::NotEnrolled { .. })));
        let result = svc.resolve_user_enrollment(USER).await;
        assert!(matches!(result, Err(UnlockError::NotEnrolled { .. })));
    }

    #[tokio::test]
    async fn user_enrollment_follows_latest_approval() {
        let svc = test_service().await;
        seed_enrollable(&svc, USER, 3).await;

        let enrollment = svc.resolve_user_enrollment(USER).await.unwrap();
        assert_eq!(enrollment.course_id, COURSE);
    }

    #[tokio::test]
    async fn user_enrollment_falls_back_to_existing_row() {
        let svc = test_service().await;
        svc.insert_enrollment_if_absent(USER, "legacy", utc("2024-01-01T00:00:00Z"), "UTC")
            .await
            .unwrap();

        let enrollment = svc.resolve_user_enrollment(USER).await.unwrap();
        assert_eq!(enrollment.course_id, "legacy");
    }
}
