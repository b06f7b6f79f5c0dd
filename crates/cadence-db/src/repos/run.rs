//! Reconciliation run history.

use cadence_core::entities::{ReconcileFailure, ReconciliationRun};

use crate::error::DatabaseError;
use crate::helpers::{get_count, parse_datetime, parse_enum};
use crate::service::CadenceService;

const SELECT_COLS: &str =
    "id, run_trigger, started_at, finished_at, enrollments_examined, unlocked, failures";

fn row_to_run(row: &libsql::Row) -> Result<ReconciliationRun, DatabaseError> {
    let failures_json: String = row.get(6)?;
    let failures: Vec<ReconcileFailure> = serde_json::from_str(&failures_json)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse run failures: {e}")))?;
    Ok(ReconciliationRun {
        id: row.get(0)?,
        trigger: parse_enum(&row.get::<String>(1)?)?,
        started_at: parse_datetime(&row.get::<String>(2)?)?,
        finished_at: parse_datetime(&row.get::<String>(3)?)?,
        enrollments_examined: get_count(row, 4)?,
        unlocked: get_count(row, 5)?,
        failures,
    })
}

impl CadenceService {
    /// Persist the summary of a finished reconciliation pass.
    pub async fn record_run(&self, run: &ReconciliationRun) -> Result<(), DatabaseError> {
        let failures = serde_json::to_string(&run.failures)
            .map_err(|e| DatabaseError::Query(format!("Failed to serialize run failures: {e}")))?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO reconciliation_runs ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    run.id.as_str(),
                    run.trigger.as_str(),
                    run.started_at.to_rfc3339(),
                    run.finished_at.to_rfc3339(),
                    run.enrollments_examined,
                    run.unlocked,
                    failures
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn latest_run(&self) -> Result<Option<ReconciliationRun>, DatabaseError> {
        Ok(self.list_runs(1).await?.into_iter().next())
    }

    /// Most recent runs first.
    pub async fn list_runs(&self, limit: u32) -> Result<Vec<ReconciliationRun>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM reconciliation_runs ORDER BY started_at DESC, id DESC LIMIT ?1"
                ),
                [limit],
            )
            .await?;
        let mut runs = Vec::new();
        while let Some(row) = rows.next().await? {
            runs.push(row_to_run(&row)?);
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_service, utc};
    use cadence_core::enums::RunTrigger;
    use pretty_assertions::assert_eq;

    fn run(id: &str, started: &str, failures: Vec<ReconcileFailure>) -> ReconciliationRun {
        ReconciliationRun {
            id: id.to_string(),
            trigger: RunTrigger::Scheduled,
            started_at: utc(started),
            finished_at: utc(started),
            enrollments_examined: 3,
            unlocked: 2,
            failures,
        }
    }

    #[tokio::test]
    async fn runs_roundtrip_with_failures() {
        let svc = test_service().await;
        let failure = ReconcileFailure {
            enrollment_id: "enr-1".to_string(),
            user_id: "u1".to_string(),
            course_id: "c1".to_string(),
            error: "Unknown timezone: Mars/Olympus".to_string(),
        };
        let original = run("run-1", "2024-01-02T00:00:00Z", vec![failure]);
        svc.record_run(&original).await.unwrap();

        assert_eq!(svc.latest_run().await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn list_runs_newest_first() {
        let svc = test_service().await;
        svc.record_run(&run("run-a", "2024-01-01T00:00:00Z", vec![])).await.unwrap();
        svc.record_run(&run("run-b", "2024-01-03T00:00:00Z", vec![])).await.unwrap();
        svc.record_run(&run("run-c", "2024-01-02T00:00:00Z", vec![])).await.unwrap();

        let ids: Vec<String> = svc.list_runs(2).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["run-b", "run-c"]);
    }

    #[tokio::test]
    async fn no_runs_yet() {
        let svc = test_service().await;
        assert!(svc.latest_run().await.unwrap().is_none());
    }
}
