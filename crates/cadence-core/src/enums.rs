//! Status enums and provenance tags for Cadence.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EnrollmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an enrollment.
///
/// ```text
/// active → paused → active (resumed)
///        → completed
///        → dropped
/// paused → dropped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Paused,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Paused, Self::Completed, Self::Dropped],
            Self::Paused => &[Self::Active, Self::Dropped],
            Self::Completed | Self::Dropped => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UnlockReason
// ---------------------------------------------------------------------------

/// Which writer produced an unlock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnlockReason {
    /// Written lazily when a user looked at their tasks.
    CompletionImplicit,
    /// Written by a reconciliation pass.
    ScheduledReconciliation,
    /// Written by an administrator, bypassing the cooldown.
    ManualAdminOverride,
}

impl UnlockReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompletionImplicit => "completion_implicit",
            Self::ScheduledReconciliation => "scheduled_reconciliation",
            Self::ManualAdminOverride => "manual_admin_override",
        }
    }
}

impl fmt::Display for UnlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskDayStatus
// ---------------------------------------------------------------------------

/// Derived per-day status shown to a user. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskDayStatus {
    Completed,
    Current,
    Locked,
}

impl TaskDayStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Current => "current",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for TaskDayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicationStatus
// ---------------------------------------------------------------------------

/// Status of an application as reported by the identity/application service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RunTrigger
// ---------------------------------------------------------------------------

/// What started a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Scheduled,
    Manual,
}

impl RunTrigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for RunTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_enrollment_states_have_no_exits() {
        assert!(EnrollmentStatus::Completed.allowed_next_states().is_empty());
        assert!(EnrollmentStatus::Dropped.allowed_next_states().is_empty());
    }

    #[test]
    fn paused_enrollment_can_resume() {
        assert!(EnrollmentStatus::Paused.can_transition_to(EnrollmentStatus::Active));
        assert!(!EnrollmentStatus::Paused.can_transition_to(EnrollmentStatus::Completed));
    }

    #[test]
    fn as_str_matches_serde() {
        for reason in [
            UnlockReason::CompletionImplicit,
            UnlockReason::ScheduledReconciliation,
            UnlockReason::ManualAdminOverride,
        ] {
            let json = serde_json::to_value(reason).unwrap();
            assert_eq!(json.as_str(), Some(reason.as_str()));
        }
        for status in [
            EnrollmentStatus::Active,
            EnrollmentStatus::Paused,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Dropped,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json.as_str(), Some(status.as_str()));
        }
    }
}
