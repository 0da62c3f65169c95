//! The trigger registry and dispatch loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use autoqliq_core::{AutomationError, JobId};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::dispatch::WorkflowDispatcher;
use crate::job::{JobEntry, JobInfo};
use crate::sink::{LogSink, RunSink};
use crate::trigger::TriggerConfig;

/// Registry of trigger → workflow bindings with background dispatch.
///
/// Fire policy: at most once per due instant, skip if late. A due fire
/// whose previous run is still executing is skipped and logged, and the
/// next fire time is always computed from "now" — missed instants are
/// never replayed. Fires that fail to start are logged and do not kill
/// the scheduler.
pub struct Scheduler {
    dispatcher: Arc<dyn WorkflowDispatcher>,
    sink: Arc<dyn RunSink>,
    clock: Arc<dyn Clock>,
    jobs: Mutex<HashMap<JobId, JobEntry>>,
    shutdown: CancellationToken,
    poll_interval: Duration,
}

impl Scheduler {
    /// Create a scheduler with the default sink, clock, and poll cadence.
    pub fn new(dispatcher: Arc<dyn WorkflowDispatcher>) -> Self {
        Self {
            dispatcher,
            sink: Arc::new(LogSink),
            clock: Arc::new(SystemClock),
            jobs: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Record run logs somewhere other than the tracing output.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn RunSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Drive trigger arithmetic from a custom clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change how often the background loop polls for due jobs.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Register a workflow on a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Config`] when the trigger
    /// configuration is invalid; nothing is registered in that case.
    pub fn schedule(
        &self,
        workflow_name: &str,
        credential_name: Option<&str>,
        config: &TriggerConfig,
    ) -> Result<JobId, AutomationError> {
        let now = self.clock.now();
        let trigger = config.build(now)?;
        let next_run_time = trigger.first_fire(now).ok_or_else(|| {
            AutomationError::config("trigger would never fire")
        })?;

        let id = JobId::v4();
        tracing::info!(
            job = %id,
            workflow = workflow_name,
            trigger = %trigger.describe(),
            next = %next_run_time,
            "scheduled workflow"
        );
        self.jobs.lock().insert(
            id,
            JobEntry {
                workflow_name: workflow_name.to_owned(),
                credential_name: credential_name.map(str::to_owned),
                trigger,
                next_run_time,
                running: Arc::new(AtomicBool::new(false)),
            },
        );
        Ok(id)
    }

    /// Snapshot of every registered job.
    #[must_use]
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        let jobs = self.jobs.lock();
        let mut infos: Vec<JobInfo> = jobs
            .iter()
            .map(|(id, entry)| JobInfo {
                id: *id,
                workflow_name: entry.workflow_name.clone(),
                credential_name: entry.credential_name.clone(),
                trigger: entry.trigger.describe(),
                next_run_time: entry.next_run_time,
            })
            .collect();
        infos.sort_by_key(|info| info.next_run_time);
        infos
    }

    /// Deregister a job. Returns `false` for unknown ids.
    ///
    /// A run already in flight completes; the job just never fires
    /// again.
    pub fn cancel(&self, job_id: JobId) -> bool {
        let removed = self.jobs.lock().remove(&job_id).is_some();
        if removed {
            tracing::info!(job = %job_id, "cancelled scheduled job");
        }
        removed
    }

    /// Fire every job whose next run time has arrived.
    ///
    /// Called by the background loop; exposed so tests (and embedders
    /// with their own cadence) can drive the scheduler directly.
    pub async fn tick(&self) {
        let now = self.clock.now();
        let mut fires = Vec::new();

        {
            let mut jobs = self.jobs.lock();
            let mut retired = Vec::new();

            for (id, entry) in jobs.iter_mut() {
                if entry.next_run_time > now {
                    continue;
                }

                let reschedule = entry.trigger.next_fire(now);

                if entry.running.load(Ordering::SeqCst) {
                    tracing::warn!(
                        job = %id,
                        workflow = %entry.workflow_name,
                        "previous run still executing, skipping this fire"
                    );
                } else {
                    entry.running.store(true, Ordering::SeqCst);
                    fires.push(Fire {
                        job_id: *id,
                        workflow_name: entry.workflow_name.clone(),
                        credential_name: entry.credential_name.clone(),
                        running: entry.running.clone(),
                    });
                }

                match reschedule {
                    Some(next) => entry.next_run_time = next,
                    None => retired.push(*id),
                }
            }

            for id in retired {
                tracing::debug!(job = %id, "one-shot job retired");
                jobs.remove(&id);
            }
        }

        for fire in fires {
            let dispatcher = self.dispatcher.clone();
            let sink = self.sink.clone();
            tokio::spawn(async move {
                tracing::info!(job = %fire.job_id, workflow = %fire.workflow_name, "firing scheduled job");
                match dispatcher
                    .dispatch(&fire.workflow_name, fire.credential_name.as_deref())
                    .await
                {
                    Ok(log) => sink.record(log).await,
                    Err(e) => {
                        tracing::error!(
                            job = %fire.job_id,
                            workflow = %fire.workflow_name,
                            error = %e,
                            "scheduled fire failed to start"
                        );
                    }
                }
                fire.running.store(false, Ordering::SeqCst);
            });
        }
    }

    /// Start the background polling loop.
    ///
    /// Runs until [`Self::stop`] is called; the returned handle resolves
    /// when the loop has exited.
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            tracing::info!(poll = ?scheduler.poll_interval, "scheduler loop started");
            loop {
                tokio::select! {
                    () = scheduler.shutdown.cancelled() => break,
                    () = tokio::time::sleep(scheduler.poll_interval) => scheduler.tick().await,
                }
            }
            tracing::info!("scheduler loop stopped");
        })
    }

    /// Stop the background loop. Jobs stay registered.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

/// A due job captured for dispatch outside the registry lock.
struct Fire {
    job_id: JobId,
    workflow_name: String,
    credential_name: Option<String>,
    running: Arc<AtomicBool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use autoqliq_engine::{ErrorStrategy, ExecutionLog, FinalStatus};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    fn stub_log(workflow_name: &str) -> ExecutionLog {
        ExecutionLog {
            workflow_name: workflow_name.to_owned(),
            start_time_iso: Utc::now().to_rfc3339(),
            end_time_iso: Utc::now().to_rfc3339(),
            duration_seconds: 0.0,
            final_status: FinalStatus::Success,
            error_message: None,
            summary: "All 0 actions completed successfully".into(),
            error_strategy: ErrorStrategy::StopOnError,
            action_results: vec![],
            had_action_failures: false,
        }
    }

    /// Dispatcher whose runs block until the test releases them.
    struct GatedDispatcher {
        gate: tokio::sync::Semaphore,
        started: AtomicUsize,
    }

    impl GatedDispatcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                gate: tokio::sync::Semaphore::new(0),
                started: AtomicUsize::new(0),
            })
        }

        fn release_one(&self) {
            self.gate.add_permits(1);
        }
    }

    #[async_trait]
    impl WorkflowDispatcher for GatedDispatcher {
        async fn dispatch(
            &self,
            workflow_name: &str,
            _credential_name: Option<&str>,
        ) -> Result<ExecutionLog, AutomationError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
            Ok(stub_log(workflow_name))
        }
    }

    /// Dispatcher that completes immediately.
    struct InstantDispatcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WorkflowDispatcher for InstantDispatcher {
        async fn dispatch(
            &self,
            workflow_name: &str,
            _credential_name: Option<&str>,
        ) -> Result<ExecutionLog, AutomationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(stub_log(workflow_name))
        }
    }

    fn interval_config(seconds: u64) -> TriggerConfig {
        TriggerConfig {
            trigger: "interval".into(),
            seconds: Some(seconds),
            ..TriggerConfig::default()
        }
    }

    async fn wait_until(mut check: impl FnMut() -> bool) {
        for _ in 0..500 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn interval_job_skips_while_previous_run_is_executing() {
        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::starting_at(t0));
        let dispatcher = GatedDispatcher::new();
        let sink = Arc::new(MemorySink::new());
        let scheduler = Scheduler::new(dispatcher.clone())
            .with_clock(clock.clone())
            .with_sink(sink.clone());

        let id = scheduler
            .schedule("nightly", None, &interval_config(1))
            .unwrap();
        assert_eq!(scheduler.list_jobs().len(), 1);

        // t0+1: first fire starts (and blocks in the dispatcher).
        clock.set(t0 + chrono::Duration::seconds(1));
        scheduler.tick().await;
        wait_until(|| dispatcher.started.load(Ordering::SeqCst) == 1).await;

        // t0+2: previous run still executing — this fire is skipped.
        clock.set(t0 + chrono::Duration::seconds(2));
        scheduler.tick().await;
        assert_eq!(dispatcher.started.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.list_jobs().len(), 1);

        // First run finishes.
        dispatcher.release_one();
        wait_until(|| sink.len() == 1).await;

        // t0+3: fires again.
        clock.set(t0 + chrono::Duration::seconds(3));
        scheduler.tick().await;
        wait_until(|| dispatcher.started.load(Ordering::SeqCst) == 2).await;
        dispatcher.release_one();
        wait_until(|| sink.len() == 2).await;

        // Cancel: no further fires no matter how far the clock advances.
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        clock.set(t0 + chrono::Duration::seconds(60));
        scheduler.tick().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(dispatcher.started.load(Ordering::SeqCst), 2);
        assert!(scheduler.list_jobs().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn date_job_fires_once_and_retires() {
        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::starting_at(t0));
        let dispatcher = Arc::new(InstantDispatcher {
            calls: AtomicUsize::new(0),
        });
        let sink = Arc::new(MemorySink::new());
        let scheduler = Scheduler::new(dispatcher.clone())
            .with_clock(clock.clone())
            .with_sink(sink.clone());

        let config = TriggerConfig {
            trigger: "date".into(),
            run_date: Some(t0 + chrono::Duration::minutes(5)),
            ..TriggerConfig::default()
        };
        scheduler.schedule("one-shot", None, &config).unwrap();

        // Not due yet.
        scheduler.tick().await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);

        clock.set(t0 + chrono::Duration::minutes(5));
        scheduler.tick().await;
        wait_until(|| sink.len() == 1).await;

        // Retired after its single fire.
        assert!(scheduler.list_jobs().is_empty());
        clock.set(t0 + chrono::Duration::minutes(60));
        scheduler.tick().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_config_registers_nothing() {
        let dispatcher = Arc::new(InstantDispatcher {
            calls: AtomicUsize::new(0),
        });
        let scheduler = Scheduler::new(dispatcher);

        let err = scheduler
            .schedule("wf", None, &TriggerConfig::default())
            .unwrap_err();
        assert!(matches!(err, AutomationError::Config { .. }));
        assert!(scheduler.list_jobs().is_empty());
    }

    #[tokio::test]
    async fn list_jobs_reports_bindings() {
        let dispatcher = Arc::new(InstantDispatcher {
            calls: AtomicUsize::new(0),
        });
        let scheduler = Scheduler::new(dispatcher);

        let id = scheduler
            .schedule("nightly", Some("github"), &interval_config(60))
            .unwrap();
        let jobs = scheduler.list_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, id);
        assert_eq!(jobs[0].workflow_name, "nightly");
        assert_eq!(jobs[0].credential_name.as_deref(), Some("github"));
        assert_eq!(jobs[0].trigger, "every 60s");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_fire_does_not_kill_the_scheduler() {
        struct FailingDispatcher {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl WorkflowDispatcher for FailingDispatcher {
            async fn dispatch(
                &self,
                _workflow_name: &str,
                _credential_name: Option<&str>,
            ) -> Result<ExecutionLog, AutomationError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(AutomationError::repository("workflow not found: ghost"))
            }
        }

        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::starting_at(t0));
        let dispatcher = Arc::new(FailingDispatcher {
            calls: AtomicUsize::new(0),
        });
        let scheduler = Scheduler::new(dispatcher.clone()).with_clock(clock.clone());

        scheduler
            .schedule("ghost", None, &interval_config(1))
            .unwrap();

        clock.set(t0 + chrono::Duration::seconds(1));
        scheduler.tick().await;
        wait_until(|| dispatcher.calls.load(Ordering::SeqCst) == 1).await;

        // Still registered and still firing.
        assert_eq!(scheduler.list_jobs().len(), 1);
        clock.set(t0 + chrono::Duration::seconds(2));
        scheduler.tick().await;
        wait_until(|| dispatcher.calls.load(Ordering::SeqCst) == 2).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn background_loop_fires_on_its_own() {
        let t0 = Utc::now();
        let clock = Arc::new(ManualClock::starting_at(t0));
        let dispatcher = Arc::new(InstantDispatcher {
            calls: AtomicUsize::new(0),
        });
        let sink = Arc::new(MemorySink::new());
        let scheduler = Arc::new(
            Scheduler::new(dispatcher.clone())
                .with_clock(clock.clone())
                .with_sink(sink.clone())
                .with_poll_interval(Duration::from_millis(5)),
        );

        scheduler
            .schedule("nightly", None, &interval_config(1))
            .unwrap();
        let handle = scheduler.start();

        clock.advance(chrono::Duration::seconds(1));
        wait_until(|| sink.len() >= 1).await;

        scheduler.stop();
        handle.await.unwrap();
    }
}
