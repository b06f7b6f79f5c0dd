use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::enums::EnrollmentStatus;
use crate::errors::CoreError;

/// Anchor record tying a (user, course) pair to a registration instant and a
/// timezone for day counting. At most one per pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub registered_at: DateTime<Utc>,
    /// IANA timezone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Parse the stored timezone name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownTimezone` if the name is not an IANA zone.
    pub fn tz(&self) -> Result<Tz, CoreError> {
        clock::parse_timezone(&self.timezone)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}
