//! Reconciliation scheduler configuration.

use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_enabled() -> bool {
    true
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_run_at() -> String {
    "00:00".to_string()
}

/// Per-enrollment timeout, in seconds.
const fn default_enrollment_timeout_secs() -> u64 {
    30
}

/// Enrollments reconciled concurrently within one pass.
const fn default_concurrency() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Whether `cadence serve` starts the recurring trigger.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Reference timezone for `run_at`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Local time of the daily pass, `HH:MM`.
    #[serde(default = "default_run_at")]
    pub run_at: String,

    #[serde(default = "default_enrollment_timeout_secs")]
    pub enrollment_timeout_secs: u64,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timezone: default_timezone(),
            run_at: default_run_at(),
            enrollment_timeout_secs: default_enrollment_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

impl SchedulerConfig {
    /// Parsed reference timezone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the name is not an IANA zone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        cadence_core::clock::parse_timezone(&self.timezone).map_err(|e| {
            ConfigError::InvalidValue {
                field: "scheduler.timezone".into(),
                reason: e.to_string(),
            }
        })
    }

    /// Parsed `run_at`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless the value is `HH:MM`.
    pub fn run_at_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.run_at, "%H:%M").map_err(|e| ConfigError::InvalidValue {
            field: "scheduler.run_at".into(),
            reason: format!("expected HH:MM: {e}"),
        })
    }

    #[must_use]
    pub const fn enrollment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrollment_timeout_secs)
    }

    /// Validate every field that has a parse step.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;
        self.run_at_time()?;
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.enrollment_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.enrollment_timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
