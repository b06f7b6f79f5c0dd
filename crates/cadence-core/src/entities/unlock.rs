use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UnlockReason;

/// Immutable fact: `day` became accessible to `user_id` in `course_id`.
///
/// At most one per (user, course, day). Day 1 never has one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnlockRecord {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub day: u32,
    pub unlocked_at: DateTime<Utc>,
    pub unlocked_by: UnlockReason,
}
