use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ApplicationStatus;

/// An internship application as reported by the identity/application service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: ApplicationStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// The instant that anchors day 1: approval time, or creation time if the
    /// approval was never stamped.
    #[must_use]
    pub fn anchor_instant(&self) -> DateTime<Utc> {
        self.approved_at.unwrap_or(self.created_at)
    }
}
