//! Response types returned as JSON by `cadence` commands.
//!
//! These structs define the shape of JSON output for `cadence tasks`,
//! `cadence today`, `cadence submit`, `cadence admin unlock`, and
//! `cadence admin status`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ReconciliationRun, Submission, UnlockRecord};
use crate::enums::{EnrollmentStatus, TaskDayStatus, UnlockReason};

/// One day of a user's course, with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskView {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub exercise: Option<String>,
    pub test: Option<String>,
    pub status: TaskDayStatus,
    pub can_access: bool,
    /// Hint for locked days: a date, or "complete previous task".
    pub unlock_date: Option<String>,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub unlocked_by: Option<UnlockReason>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Course header shown above the task list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub total_days: u32,
}

/// Aggregate counts over a projection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u32,
    pub completed: u32,
    pub current: u32,
    pub locked: u32,
}

impl TaskCounts {
    /// Tally statuses from a projection.
    #[must_use]
    pub fn from_views(views: &[TaskView]) -> Self {
        views.iter().fold(Self::default(), |mut acc, view| {
            acc.total += 1;
            match view.status {
                TaskDayStatus::Completed => acc.completed += 1,
                TaskDayStatus::Current => acc.current += 1,
                TaskDayStatus::Locked => acc.locked += 1,
            }
            acc
        })
    }

    /// Completed share of all days, rounded down.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }
}

/// Response from `cadence tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskViewResponse {
    pub user_id: String,
    pub course: CourseSummary,
    pub enrollment_status: EnrollmentStatus,
    pub timezone: String,
    pub journey_day: u32,
    pub tasks: Vec<TaskView>,
    pub counts: TaskCounts,
    pub progress_percent: u32,
}

/// Response from `cadence today`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TodayTaskResponse {
    Available {
        day: u32,
        task: TaskView,
        can_submit: bool,
        unlock_date: Option<String>,
    },
    NotAvailable {
        reason: String,
    },
}

/// Response from `cadence submit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmitTaskResponse {
    pub submission: Submission,
    /// When the next day opens, if there is a next day.
    pub next_unlock_at: Option<DateTime<Utc>>,
    pub course_completed: bool,
}

/// Response from `cadence admin unlock`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManualUnlockResponse {
    pub record: UnlockRecord,
    /// False when the day was already unlocked; `record` is then the existing entry.
    pub newly_recorded: bool,
}

/// Response from `cadence admin status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SchedulerStatusResponse {
    pub is_running: bool,
    pub timezone: String,
    pub run_at: String,
    pub last_run: Option<ReconciliationRun>,
    pub next_scheduled_run: Option<DateTime<Utc>>,
}
