//! Shared test utilities for cadence-db unit tests.

use chrono::{DateTime, Utc};

use crate::CadenceDb;
use crate::service::CadenceService;

pub const COURSE: &str = "rust-101";
pub const USER: &str = "user-1";

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// In-memory service with `Asia/Kolkata` as the default timezone.
pub async fn test_service() -> CadenceService {
    let db = CadenceDb::open_local(":memory:").await.unwrap();
    CadenceService::from_db(db, chrono_tz::Asia::Kolkata)
}

/// Seed a course with `days` templates.
pub async fn seed_course(svc: &CadenceService, course_id: &str, days: u32) {
    svc.upsert_course(course_id, "Rust in a month", Some("Daily Rust exercises"))
        .await
        .unwrap();
    for day in 1..=days {
        svc.upsert_task_template(
            course_id,
            day,
            &format!("Day {day}"),
            &format!("Task for day {day}"),
            None,
            None,
        )
        .await
        .unwrap();
    }
}

/// Seed a course plus an approved application for `user_id`, approved at
/// 2024-01-01T00:00 Asia/Kolkata.
pub async fn seed_enrollable(svc: &CadenceService, user_id: &str, days: u32) {
    seed_course(svc, COURSE, days).await;
    svc.record_application(
        user_id,
        COURSE,
        cadence_core::enums::ApplicationStatus::Approved,
        Some(utc("2024-01-01T00:00:00+05:30")),
    )
    .await
    .unwrap();
}
