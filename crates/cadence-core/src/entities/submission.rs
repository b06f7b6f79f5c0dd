use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A user's completion of one course day. At most one per (user, course, day);
/// never mutated once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub day: u32,
    pub description: String,
    /// Opaque reference handed over by the file service.
    pub file_ref: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
