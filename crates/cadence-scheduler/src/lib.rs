//! # cadence-scheduler
//!
//! Recurring reconciliation of the unlock ledger.
//!
//! A [`Scheduler`] is an explicit handle: [`Scheduler::start`] spawns the daily
//! trigger loop, [`Scheduler::stop`] cancels it, and [`Scheduler::status`]
//! reports the last pass and the next trigger. [`Scheduler::run_once`] runs a
//! single pass directly and is safe to call at any time, any number of times:
//! every write it makes is idempotent, so an early, late, or repeated pass
//! converges on the same ledger.
//!
//! Within a pass, enrollments are reconciled concurrently (bounded by
//! `scheduler.concurrency`), each under its own timeout. One enrollment's
//! failure is recorded in the run summary and never aborts the pass.

pub mod error;
pub mod schedule;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cadence_config::SchedulerConfig;
use cadence_core::entities::{Enrollment, ReconcileFailure, ReconciliationRun};
use cadence_core::enums::{EnrollmentStatus, RunTrigger};
use cadence_core::ids::PREFIX_RUN;
use cadence_core::responses::SchedulerStatusResponse;
use cadence_db::error::UnlockError;
use cadence_db::service::CadenceService;

pub use error::SchedulerError;

#[derive(Default)]
struct State {
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
    next_run: Option<DateTime<Utc>>,
    last_run: Option<ReconciliationRun>,
}

/// Handle for the reconciliation trigger.
pub struct Scheduler {
    service: Arc<CadenceService>,
    settings: SchedulerConfig,
    tz: Tz,
    run_at: NaiveTime,
    state: Mutex<State>,
    /// Held for the duration of a pass so passes never overlap.
    pass_lock: tokio::sync::Mutex<()>,
}

impl Scheduler {
    /// Build a scheduler over `service`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Config` if the settings do not validate.
    pub fn new(service: Arc<CadenceService>, settings: SchedulerConfig) -> Result<Self, SchedulerError> {
        settings.validate()?;
        let tz = settings.tz()?;
        let run_at = settings.run_at_time()?;
        Ok(Self {
            service,
            settings,
            tz,
            run_at,
            state: Mutex::new(State::default()),
            pass_lock: tokio::sync::Mutex::new(()),
        })
    }

    #[must_use]
    pub const fn service(&self) -> &Arc<CadenceService> {
        &self.service
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Run one reconciliation pass evaluated at the current instant.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run_once_at`].
    pub async fn run_once(&self, trigger: RunTrigger) -> Result<ReconciliationRun, SchedulerError> {
        self.run_once_at(trigger, Utc::now()).await
    }

    /// Run one reconciliation pass over all active enrollments, evaluating
    /// unlocks as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Database` only when the active enrollments
    /// cannot be listed. Per-enrollment errors and timeouts are collected in
    /// [`ReconciliationRun::failures`].
    pub async fn run_once_at(
        &self,
        trigger: RunTrigger,
        now: DateTime<Utc>,
    ) -> Result<ReconciliationRun, SchedulerError> {
        let service = &self.service;
        self.run_pass(trigger, move |enrollment| async move {
            service.reconcile_enrollment(&enrollment, now).await
        })
        .await
    }

    /// One pass with `reconcile` applied to every active enrollment, each
    /// bounded by the enrollment timeout.
    async fn run_pass<F, Fut>(
        &self,
        trigger: RunTrigger,
        reconcile: F,
    ) -> Result<ReconciliationRun, SchedulerError>
    where
        F: Fn(Enrollment) -> Fut,
        Fut: Future<Output = Result<u32, UnlockError>>,
    {
        let _pass = self.pass_lock.lock().await;
        let started_at = Utc::now();

        let enrollments = self
            .service
            .list_enrollments_by_status(EnrollmentStatus::Active)
            .await?;
        tracing::info!(%trigger, enrollments = enrollments.len(), "reconciliation pass started");

        let timeout = self.settings.enrollment_timeout();
        let reconcile = &reconcile;
        let results: Vec<(Enrollment, Result<u32, String>)> = stream::iter(enrollments)
            .map(|enrollment| async move {
                let outcome = with_timeout(reconcile(enrollment.clone()), timeout).await;
                (enrollment, outcome)
            })
            .buffer_unordered(self.settings.concurrency)
            .collect()
            .await;

        let mut examined = 0u32;
        let mut unlocked = 0u32;
        let mut failures = Vec::new();
        for (enrollment, outcome) in results {
            examined += 1;
            match outcome {
                Ok(count) => unlocked += count,
                Err(error) => {
                    tracing::warn!(
                        enrollment_id = %enrollment.id,
                        user_id = %enrollment.user_id,
                        course_id = %enrollment.course_id,
                        %error,
                        "enrollment reconciliation failed; skipped for this pass"
                    );
                    failures.push(ReconcileFailure {
                        enrollment_id: enrollment.id,
                        user_id: enrollment.user_id,
                        course_id: enrollment.course_id,
                        error,
                    });
                }
            }
        }
        failures.sort_by(|a, b| a.enrollment_id.cmp(&b.enrollment_id));

        let run = ReconciliationRun {
            id: self.service.db().generate_id(PREFIX_RUN).await?,
            trigger,
            started_at,
            finished_at: Utc::now(),
            enrollments_examined: examined,
            unlocked,
            failures,
        };
        if let Err(error) = self.service.record_run(&run).await {
            tracing::warn!(run_id = %run.id, %error, "failed to persist reconciliation run");
        }
        tracing::info!(
            run_id = %run.id,
            examined,
            unlocked,
            failed = run.failures.len(),
            "reconciliation pass finished"
        );

        self.state.lock().last_run = Some(run.clone());
        Ok(run)
    }

    /// Spawn the daily trigger loop.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::AlreadyRunning` if the loop is live.
    pub fn start(self: &Arc<Self>) -> Result<(), SchedulerError> {
        let mut state = self.state.lock();
        if state.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(SchedulerError::AlreadyRunning);
        }

        let token = CancellationToken::new();
        let this = Arc::clone(self);
        let child = token.clone();
        state.handle = Some(tokio::spawn(async move { this.run_loop(child).await }));
        state.cancel = Some(token);
        drop(state);

        tracing::info!(timezone = self.tz.name(), run_at = %self.run_at, "scheduler started");
        Ok(())
    }

    /// Cancel the trigger loop and wait for it to exit.
    ///
    /// A pass in flight is abandoned; whatever it already wrote stays valid.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::NotRunning` if the loop was never started or
    /// has already been stopped.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let (cancel, handle) = {
            let mut state = self.state.lock();
            (state.cancel.take(), state.handle.take())
        };
        let (Some(cancel), Some(handle)) = (cancel, handle) else {
            return Err(SchedulerError::NotRunning);
        };

        cancel.cancel();
        if let Err(error) = handle.await
            && !error.is_cancelled()
        {
            tracing::warn!(%error, "scheduler task join error");
        }
        self.state.lock().next_run = None;
        tracing::info!("scheduler stopped");
        Ok(())
    }

    /// Current lifecycle state plus the last pass.
    ///
    /// Falls back to the latest persisted run when this process has not run a
    /// pass yet. When the loop is not running, `next_scheduled_run` is the
    /// time the daily trigger would fire next if enabled.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Database` if run history cannot be read.
    pub async fn status(&self) -> Result<SchedulerStatusResponse, SchedulerError> {
        let is_running = self.is_running();
        let (next_run, last_run) = {
            let state = self.state.lock();
            (state.next_run, state.last_run.clone())
        };
        let last_run = match last_run {
            Some(run) => Some(run),
            None => self.service.latest_run().await?,
        };
        let next_scheduled_run = if is_running {
            next_run
        } else if self.settings.enabled {
            Some(schedule::next_run_after(Utc::now(), self.tz, self.run_at))
        } else {
            None
        };

        Ok(SchedulerStatusResponse {
            is_running,
            timezone: self.tz.name().to_string(),
            run_at: self.run_at.format("%H:%M").to_string(),
            last_run,
            next_scheduled_run,
        })
    }

    async fn run_loop(self: Arc<Self>, cancel: CancellationToken) {
        loop {
            let now = Utc::now();
            let next = schedule::next_run_after(now, self.tz, self.run_at);
            self.state.lock().next_run = Some(next);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::debug!(%next, "next reconciliation pass scheduled");

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }
            tokio::select! {
                () = cancel.cancelled() => break,
                result = self.run_once(RunTrigger::Scheduled) => {
                    if let Err(error) = result {
                        tracing::warn!(%error, "reconciliation pass failed; retrying at next trigger");
                    }
                }
            }
        }
        tracing::debug!("scheduler loop exited");
    }
}

async fn with_timeout(
    reconcile: impl Future<Output = Result<u32, UnlockError>>,
    timeout: Duration,
) -> Result<u32, String> {
    match tokio::time::timeout(timeout, reconcile).await {
        Ok(Ok(count)) => Ok(count),
        Ok(Err(error)) => Err(error.to_string()),
        Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::enums::ApplicationStatus;
    use pretty_assertions::assert_eq;

    const COURSE: &str = "rust-101";

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    async fn service_with_users(users: &[&str]) -> Arc<CadenceService> {
        let svc = CadenceService::new_local(":memory:", chrono_tz::Asia::Kolkata)
            .await
            .unwrap();
        svc.upsert_course(COURSE, "Rust", None).await.unwrap();
        for day in 1..=3 {
            svc.upsert_task_template(COURSE, day, &format!("Day {day}"), "", None, None)
                .await
                .unwrap();
        }
        for user in users {
            svc.record_application(
                user,
                COURSE,
                ApplicationStatus::Approved,
                Some(utc("2024-01-01T00:00:00+05:30")),
            )
            .await
            .unwrap();
            svc.submit_task_at(user, COURSE, 1, "done", None, utc("2024-01-01T10:00:00+05:30"))
                .await
                .unwrap();
        }
        Arc::new(svc)
    }

    #[tokio::test]
    async fn stalled_enrollment_times_out_without_blocking_others() {
        let svc = service_with_users(&["stuck", "steady"]).await;
        let settings = SchedulerConfig {
            enrollment_timeout_secs: 1,
            ..SchedulerConfig::default()
        };
        let scheduler = Scheduler::new(Arc::clone(&svc), settings).unwrap();
        let now = utc("2024-01-02T08:00:00+05:30");

        let inner = Arc::clone(&svc);
        let run = scheduler
            .run_pass(RunTrigger::Manual, move |enrollment| {
                let svc = Arc::clone(&inner);
                async move {
                    if enrollment.user_id == "stuck" {
                        std::future::pending::<Result<u32, UnlockError>>().await
                    } else {
                        svc.reconcile_enrollment(&enrollment, now).await
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(run.enrollments_examined, 2);
        assert_eq!(run.unlocked, 1);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].user_id, "stuck");
        assert_eq!(run.failures[0].error, "timed out after 1s");

        assert_eq!(svc.list_unlocks("steady", COURSE).await.unwrap().len(), 1);
        assert!(svc.list_unlocks("stuck", COURSE).await.unwrap().is_empty());
        assert_eq!(svc.latest_run().await.unwrap(), Some(run));
    }

    #[tokio::test]
    async fn timeout_wrapper_passes_through_results() {
        let ok = with_timeout(async { Ok::<u32, UnlockError>(3) }, Duration::from_secs(1)).await;
        assert_eq!(ok, Ok(3));

        let failed = with_timeout(
            async { Err::<u32, _>(UnlockError::NotEnrolled { user_id: "u".into() }) },
            Duration::from_secs(1),
        )
        .await;
        assert!(failed.is_err());
    }
}
