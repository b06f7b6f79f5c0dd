//! Unlock rule evaluator.
//!
//! The one place that decides whether a course day is accessible. The
//! reconciliation pass, the task view, and submission acceptance all call
//! [`UnlockRules::should_unlock`]; none of them re-derive the rules.
//!
//! Rules, in order:
//! 1. Day 1 is always available.
//! 2. A day with an existing unlock record is available once the previous
//!    day has a submission. A record skips rules 3 and 5, never rule 4, so
//!    manual overrides bypass the pacing but not the sequence.
//! 3. A day beyond the current journey day is too early.
//! 4. The previous day must have a submission.
//! 5. The day opens at local midnight after the previous day's submission.
//! 6. Otherwise the day unlocks.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::entities::{Enrollment, Submission, UnlockRecord};
use crate::enums::UnlockReason;
use crate::errors::CoreError;

/// Why a day is or is not accessible.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    FirstDay,
    PreviouslyUnlocked {
        unlocked_at: DateTime<Utc>,
        unlocked_by: UnlockReason,
    },
    TooEarly {
        current_journey_day: u32,
        opens_on: NaiveDate,
    },
    PreviousIncomplete {
        previous_day: u32,
    },
    CoolingDown {
        unlocks_at: DateTime<Utc>,
        unlocks_on: NaiveDate,
    },
    Ready,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstDay => f.write_str("day 1 always available"),
            Self::PreviouslyUnlocked {
                unlocked_at,
                unlocked_by,
            } => write!(
                f,
                "unlocked {} ({unlocked_by})",
                unlocked_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Self::TooEarly {
                current_journey_day,
                opens_on,
            } => write!(f, "unlocks {opens_on} (currently day {current_journey_day})"),
            Self::PreviousIncomplete { previous_day } => {
                write!(f, "complete day {previous_day} first")
            }
            Self::CoolingDown { unlocks_on, .. } => write!(f, "unlocks {unlocks_on}"),
            Self::Ready => f.write_str("previous day completed and cooldown elapsed"),
        }
    }
}

/// The evaluator's verdict for one day.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnlockDecision {
    pub day: u32,
    pub unlock: bool,
    pub reason: DecisionReason,
}

impl UnlockDecision {
    /// Whether the decision is backed by a persisted unlock record.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self.reason, DecisionReason::PreviouslyUnlocked { .. })
    }

    /// Whether a new ledger entry should be written for this decision.
    ///
    /// Day 1 never gets a record and already-recorded days need no second one.
    #[must_use]
    pub const fn needs_record(&self) -> bool {
        self.unlock && matches!(self.reason, DecisionReason::Ready)
    }

    /// Human-readable hint for a locked day.
    #[must_use]
    pub fn unlock_date(&self) -> Option<String> {
        match &self.reason {
            DecisionReason::PreviousIncomplete { .. } => Some("complete previous task".to_string()),
            DecisionReason::CoolingDown { unlocks_on, .. } => Some(unlocks_on.to_string()),
            DecisionReason::TooEarly { opens_on, .. } => Some(opens_on.to_string()),
            _ => None,
        }
    }

    /// Next instant at which the verdict may change, if it is time-bound.
    #[must_use]
    pub const fn unlocks_at(&self) -> Option<DateTime<Utc>> {
        match &self.reason {
            DecisionReason::CoolingDown { unlocks_at, .. } => Some(*unlocks_at),
            _ => None,
        }
    }
}

/// Evaluator bound to one enrollment's history at one instant.
///
/// Holds only borrowed state; build one per enrollment and call
/// [`should_unlock`](Self::should_unlock) for each day in increasing order.
#[derive(Debug)]
pub struct UnlockRules<'a> {
    registered_at: DateTime<Utc>,
    tz: Tz,
    now: DateTime<Utc>,
    submissions: HashMap<u32, &'a Submission>,
    unlocks: HashMap<u32, &'a UnlockRecord>,
}

impl<'a> UnlockRules<'a> {
    /// Bind the rules to an enrollment, its history, and the current instant.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownTimezone` if the enrollment's timezone is invalid.
    pub fn new(
        enrollment: &Enrollment,
        submissions: &'a [Submission],
        unlocks: &'a [UnlockRecord],
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        Ok(Self::with_timezone(
            enrollment.registered_at,
            enrollment.tz()?,
            submissions,
            unlocks,
            now,
        ))
    }

    /// Bind the rules with an already-parsed timezone.
    #[must_use]
    pub fn with_timezone(
        registered_at: DateTime<Utc>,
        tz: Tz,
        submissions: &'a [Submission],
        unlocks: &'a [UnlockRecord],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            registered_at,
            tz,
            now,
            submissions: submissions.iter().map(|s| (s.day, s)).collect(),
            unlocks: unlocks.iter().map(|u| (u.day, u)).collect(),
        }
    }

    /// Current journey day of the bound enrollment.
    #[must_use]
    pub fn journey_day(&self) -> u32 {
        clock::journey_day(self.registered_at, self.tz, self.now)
    }

    #[must_use]
    pub fn submission(&self, day: u32) -> Option<&'a Submission> {
        self.submissions.get(&day).copied()
    }

    #[must_use]
    pub fn unlock_record(&self, day: u32) -> Option<&'a UnlockRecord> {
        self.unlocks.get(&day).copied()
    }

    /// Decide whether `day` is accessible right now.
    #[must_use]
    pub fn should_unlock(&self, day: u32) -> UnlockDecision {
        let reason = self.evaluate(day);
        let unlock = matches!(
            reason,
            DecisionReason::FirstDay
                | DecisionReason::PreviouslyUnlocked { .. }
                | DecisionReason::Ready
        );
        UnlockDecision {
            day,
            unlock,
            reason,
        }
    }

    fn evaluate(&self, day: u32) -> DecisionReason {
        if day <= 1 {
            return DecisionReason::FirstDay;
        }

        let previous_day = day - 1;
        if let Some(record) = self.unlock_record(day) {
            if self.submission(previous_day).is_none() {
                return DecisionReason::PreviousIncomplete { previous_day };
            }
            return DecisionReason::PreviouslyUnlocked {
                unlocked_at: record.unlocked_at,
                unlocked_by: record.unlocked_by,
            };
        }

        let current = self.journey_day();
        if day > current {
            return DecisionReason::TooEarly {
                current_journey_day: current,
                opens_on: clock::journey_day_date(self.registered_at, self.tz, day),
            };
        }

        let Some(previous) = self.submission(previous_day) else {
            return DecisionReason::PreviousIncomplete { previous_day };
        };

        let unlocks_at = clock::next_unlock_instant(previous.submitted_at, self.tz);
        if self.now < unlocks_at {
            return DecisionReason::CoolingDown {
                unlocks_at,
                unlocks_on: clock::local_date(unlocks_at, self.tz),
            };
        }

        DecisionReason::Ready
    }
}
