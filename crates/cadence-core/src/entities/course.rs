use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A course from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One day's task within a course. `day` is unique within the course and is
/// the join key for submissions and unlock records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskTemplate {
    pub id: String,
    pub course_id: String,
    pub day: u32,
    pub title: String,
    pub description: String,
    pub exercise: Option<String>,
    pub test: Option<String>,
}
