//! Journey-day clock.
//!
//! All arithmetic happens on civil dates in the enrollment's timezone, never on
//! elapsed hours, so daylight-saving shifts cannot move a day boundary.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::CoreError;

/// Parse an IANA timezone name.
///
/// # Errors
///
/// Returns `CoreError::UnknownTimezone` if the name is not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimezone(name.to_string()))
}

/// The civil date of `instant` as observed in `tz`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// The first instant of `date` in `tz`.
///
/// Midnight does not exist on some DST-forward days (e.g. `America/Sao_Paulo`);
/// the first hour that does exist is used instead.
#[must_use]
pub fn start_of_local_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    for hour in 0..24 {
        let Some(naive) = date.and_hms_opt(hour, 0, 0) else {
            continue;
        };
        if let Some(local) = tz.from_local_datetime(&naive).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Journey day of `now` for an enrollment registered at `registered_at`.
///
/// The registration date is day 1. Instants before registration also map to
/// day 1, so the result is always `>= 1` and non-decreasing in `now`.
#[must_use]
pub fn journey_day(registered_at: DateTime<Utc>, tz: Tz, now: DateTime<Utc>) -> u32 {
    let elapsed = local_date(now, tz)
        .signed_duration_since(local_date(registered_at, tz))
        .num_days();
    u32::try_from(elapsed.max(0)).map_or(u32::MAX, |days| days.saturating_add(1))
}

/// Civil date on which journey day `day` begins.
#[must_use]
pub fn journey_day_date(registered_at: DateTime<Utc>, tz: Tz, day: u32) -> NaiveDate {
    let start = local_date(registered_at, tz);
    start
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
        .unwrap_or(NaiveDate::MAX)
}

/// Earliest instant the day after a submission made at `submitted_at` may open:
/// local midnight at the start of the following civil day.
#[must_use]
pub fn next_unlock_instant(submitted_at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let next = local_date(submitted_at, tz)
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    start_of_local_day(next, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    const KOLKATA: Tz = chrono_tz::Asia::Kolkata;

    #[rstest]
    // Registered 2024-01-01T00:00 IST == 2023-12-31T18:30Z
    #[case("2023-12-31T18:30:00Z", 1)]
    #[case("2024-01-01T18:29:00Z", 1)] // 23:59 IST, still day 1
    #[case("2024-01-01T18:31:00Z", 2)] // 00:01 IST on Jan 2
    #[case("2024-01-10T12:00:00Z", 10)]
    #[case("2023-12-01T00:00:00Z", 1)] // before registration clamps to 1
    fn journey_day_in_kolkata(#[case] now: &str, #[case] expected: u32) {
        let registered = utc("2023-12-31T18:30:00Z");
        assert_eq!(journey_day(registered, KOLKATA, utc(now)), expected);
    }

    #[test]
    fn journey_day_is_monotonic() {
        let registered = utc("2024-03-01T09:00:00Z");
        let tz = chrono_tz::America::New_York;
        let mut previous = 0;
        let mut now = registered - chrono::Duration::days(2);
        for _ in 0..(24 * 60) {
            let day = journey_day(registered, tz, now);
            assert!(day >= previous, "journey day went backwards at {now}");
            previous = day;
            now += chrono::Duration::hours(1);
        }
    }

    #[test]
    fn dst_spring_forward_keeps_calendar_days() {
        // New York springs forward 2024-03-10; that civil day has 23 hours.
        let tz = chrono_tz::America::New_York;
        let registered = utc("2024-03-09T17:00:00Z"); // 12:00 EST on Mar 9
        assert_eq!(journey_day(registered, tz, utc("2024-03-10T04:59:00Z")), 1); // 23:59 EST
        assert_eq!(journey_day(registered, tz, utc("2024-03-10T05:00:00Z")), 2); // 00:00 EST
        assert_eq!(journey_day(registered, tz, utc("2024-03-11T03:59:00Z")), 2); // 23:59 EDT
        assert_eq!(journey_day(registered, tz, utc("2024-03-11T04:00:00Z")), 3); // 00:00 EDT
    }

    #[test]
    fn next_unlock_is_following_local_midnight() {
        // 2024-01-01T10:00 IST
        let submitted = utc("2024-01-01T04:30:00Z");
        assert_eq!(
            next_unlock_instant(submitted, KOLKATA),
            utc("2024-01-01T18:30:00Z")
        );
    }

    #[test]
    fn missing_midnight_falls_forward() {
        // Sao Paulo skipped 2018-11-04T00:00 local, clocks jumped to 01:00.
        let tz = chrono_tz::America::Sao_Paulo;
        let date = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        let start = start_of_local_day(date, tz);
        assert_eq!(local_date(start, tz), date);
        assert_eq!(start.with_timezone(&tz).format("%H:%M").to_string(), "01:00");
    }

    #[test]
    fn journey_day_date_offsets_from_registration() {
        let registered = utc("2023-12-31T18:30:00Z");
        assert_eq!(
            journey_day_date(registered, KOLKATA, 3),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn parse_timezone_rejects_unknown() {
        assert!(parse_timezone("Asia/Kolkata").is_ok());
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(CoreError::UnknownTimezone(_))
        ));
    }
}
