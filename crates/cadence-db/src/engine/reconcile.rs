//! Per-enrollment reconciliation.
//!
//! The scheduler drives this for every active enrollment. Each call is
//! idempotent: days that already have a ledger entry are skipped, and a lost
//! insert race is reported as `AlreadyUnlocked` rather than an error.

use chrono::{DateTime, Utc};

use cadence_core::entities::Enrollment;
use cadence_core::enums::UnlockReason;
use cadence_core::rules::UnlockRules;

use crate::error::UnlockError;
use crate::service::CadenceService;

impl CadenceService {
    /// Evaluate days `2..=min(journey_day, last_day)` and record every day the
    /// evaluator opens. Returns the number of new ledger entries.
    ///
    /// # Errors
    ///
    /// Returns `CourseNotFound`, an unknown-timezone error, or a storage error;
    /// the caller treats any of them as a failure of this enrollment only.
    pub async fn reconcile_enrollment(
        &self,
        enrollment: &Enrollment,
        now: DateTime<Utc>,
    ) -> Result<u32, UnlockError> {
        let catalog = self.load_catalog(&enrollment.course_id).await?;
        let Some(last_day) = catalog.last_day() else {
            return Ok(0);
        };
        let history = self.load_history(enrollment).await?;
        let rules = UnlockRules::new(enrollment, &history.submissions, &history.unlocks, now)?;
        let upto = rules.journey_day().min(last_day);

        let mut unlocked = 0;
        for template in catalog.templates.iter().filter(|t| (2..=upto).contains(&t.day)) {
            if rules.unlock_record(template.day).is_some() {
                continue;
            }
            let decision = rules.should_unlock(template.day);
            if !decision.needs_record() {
                continue;
            }
            let outcome = self
                .record_unlock_at(
                    &enrollment.user_id,
                    &enrollment.course_id,
                    template.day,
                    UnlockReason::ScheduledReconciliation,
                    now,
                )
                .await?;
            if outcome.is_new() {
                unlocked += 1;
            }
        }

        tracing::debug!(
            enrollment_id = %enrollment.id,
            journey_day = rules.journey_day(),
            unlocked,
            "enrollment reconciled"
        );
        Ok(unlocked)
    }
}
