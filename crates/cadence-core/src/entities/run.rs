use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RunTrigger;

/// One enrollment that could not be reconciled during a pass.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub enrollment_id: String,
    pub user_id: String,
    pub course_id: String,
    pub error: String,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconciliationRun {
    pub id: String,
    pub trigger: RunTrigger,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub enrollments_examined: u32,
    pub unlocked: u32,
    pub failures: Vec<ReconcileFailure>,
}
