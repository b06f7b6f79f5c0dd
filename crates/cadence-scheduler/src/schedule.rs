//! Daily trigger arithmetic.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use cadence_core::clock;

/// The instant `run_at` falls on `date` in `tz`.
///
/// A wall time skipped by a DST jump resolves to the first valid instant after
/// it; a repeated wall time resolves to its first occurrence.
#[must_use]
pub fn local_instant(date: NaiveDate, run_at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(run_at);
    for minutes in (0..=180).step_by(15) {
        let shifted = naive + TimeDelta::minutes(minutes);
        if let Some(local) = tz.from_local_datetime(&shifted).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    clock::start_of_local_day(date, tz)
}

/// First daily trigger strictly after `now`.
#[must_use]
pub fn next_run_after(now: DateTime<Utc>, tz: Tz, run_at: NaiveTime) -> DateTime<Utc> {
    let today = clock::local_date(now, tz);
    let mut date = today;
    loop {
        let candidate = local_instant(date, run_at, tz);
        if candidate > now {
            return candidate;
        }
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => return candidate,
        }
    }
}
