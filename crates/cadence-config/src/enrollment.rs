//! Defaults applied when an enrollment is created lazily.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrollmentConfig {
    /// IANA timezone given to new enrollments.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

impl EnrollmentConfig {
    /// Parsed `default_timezone`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the name is not an IANA zone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        cadence_core::clock::parse_timezone(&self.default_timezone).map_err(|e| {
            ConfigError::InvalidValue {
                field: "enrollment.default_timezone".into(),
                reason: e.to_string(),
            }
        })
    }
}
