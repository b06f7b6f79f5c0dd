use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a `snake_case` enum value through its serde representation.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an RFC 3339 instant into UTC.
pub fn parse_instant(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use cadence_core::enums::EnrollmentStatus;

    use super::{parse_enum, parse_instant};

    #[test]
    fn parses_snake_case_enum() {
        let status: EnrollmentStatus = parse_enum("paused", "status").expect("status should parse");
        assert_eq!(status, EnrollmentStatus::Paused);
    }

    #[test]
    fn accepts_uppercase_input() {
        let status: EnrollmentStatus = parse_enum("Dropped", "status").expect("status should parse");
        assert_eq!(status, EnrollmentStatus::Dropped);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<EnrollmentStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }

    #[test]
    fn instants_are_normalized_to_utc() {
        let instant = parse_instant("2024-01-01T10:00:00+05:30", "approved_at")
            .expect("instant should parse");
        assert_eq!(instant.to_rfc3339(), "2024-01-01T04:30:00+00:00");
    }

    #[test]
    fn rejects_dates_without_time() {
        assert!(parse_instant("2024-01-01", "approved_at").is_err());
    }
}
