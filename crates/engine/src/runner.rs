//! The single entry point for running one workflow.

use std::sync::Arc;

use autoqliq_action::Action;
use autoqliq_core::AutomationError;
use autoqliq_credential::CredentialStore;
use autoqliq_driver::{DriverManager, DriverOptions, WebDriver};
use autoqliq_workflow::WorkflowRepository;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::context::ExecutionContext;
use crate::executor::ActionExecutor;
use crate::log::ExecutionLog;
use crate::manager::ExecutionManager;
use crate::processor::ResultProcessor;
use crate::strategy::ErrorStrategy;

/// Composes driver lifetime, action orchestration, and log assembly.
///
/// This is the only type that knows both when the driver must be
/// released and how the log is produced; the manager and processor stay
/// agnostic of each other. `run` is the exception firewall: whatever
/// terminates the execution becomes the log's `error_message`, and the
/// caller always receives an [`ExecutionLog`], never an error.
pub struct WorkflowRunner {
    driver_manager: Arc<DriverManager>,
    driver_options: DriverOptions,
    credentials: Arc<dyn CredentialStore>,
    repository: Arc<dyn WorkflowRepository>,
    strategy: ErrorStrategy,
    processor: ResultProcessor,
    cancellation: CancellationToken,
}

impl WorkflowRunner {
    /// Create a runner with the default strategy and processor.
    pub fn new(
        driver_manager: Arc<DriverManager>,
        driver_options: DriverOptions,
        credentials: Arc<dyn CredentialStore>,
        repository: Arc<dyn WorkflowRepository>,
    ) -> Self {
        Self {
            driver_manager,
            driver_options,
            credentials,
            repository,
            strategy: ErrorStrategy::default(),
            processor: ResultProcessor::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the error strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use a custom result processor (e.g. a tuned redaction filter).
    #[must_use]
    pub fn with_processor(mut self, processor: ResultProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Share a cancellation token with the submitter.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// The token that stops this runner's runs.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Execute `actions` as one run of `workflow_name`.
    ///
    /// Acquires a driver, walks the actions, and always releases the
    /// driver before assembling the log — for every terminal state:
    /// success, failure, stop, and panic inside the execution task.
    pub async fn run(&self, actions: &[Action], workflow_name: &str) -> ExecutionLog {
        let started = Utc::now();
        let ctx = ExecutionContext::new(workflow_name)
            .with_cancellation(self.cancellation.clone())
            .shared();
        let execution_id = ctx.execution_id;

        tracing::info!(
            workflow = workflow_name,
            %execution_id,
            actions = actions.len(),
            strategy = %self.strategy,
            "starting workflow run"
        );

        // A stop requested before the run started still yields a log.
        if let Err(e) = ctx.check_cancelled() {
            return self.finish(workflow_name, &[], started, Some(&e), false);
        }

        let driver: Arc<dyn WebDriver> =
            match self.driver_manager.acquire(&self.driver_options).await {
                Ok(driver) => Arc::from(driver),
                Err(e) => {
                    tracing::error!(workflow = workflow_name, error = %e, "driver acquisition failed");
                    return self.finish(workflow_name, &[], started, Some(&e), false);
                }
            };

        let executor = ActionExecutor::new(driver.clone(), self.credentials.clone());
        let manager = Arc::new(ExecutionManager::new(
            executor,
            self.repository.clone(),
            self.strategy,
        ));

        // The sequence runs in its own task so a panic surfaces as a
        // join error here instead of unwinding past the release below.
        let task_manager = manager.clone();
        let task_ctx = ctx.clone();
        let task_actions = actions.to_vec();
        let execution = tokio::spawn(async move {
            let mut results = Vec::new();
            let outcome = task_manager
                .execute_actions(&task_actions, &task_ctx, &mut results, "", 0)
                .await;
            (results, outcome)
        });

        let (results, outcome) = match execution.await {
            Ok(pair) => pair,
            Err(join_error) => {
                tracing::error!(workflow = workflow_name, %join_error, "execution task panicked");
                (
                    Vec::new(),
                    Err(AutomationError::workflow_in(
                        workflow_name,
                        format!("execution task panicked: {join_error}"),
                    )),
                )
            }
        };

        self.driver_manager.release(driver.as_ref()).await;

        self.finish(
            workflow_name,
            &results,
            started,
            outcome.err().as_ref(),
            ctx.had_action_failures(),
        )
    }

    fn finish(
        &self,
        workflow_name: &str,
        results: &[autoqliq_action::ActionResult],
        started: chrono::DateTime<Utc>,
        error: Option<&AutomationError>,
        had_action_failures: bool,
    ) -> ExecutionLog {
        self.processor.create_execution_log(
            workflow_name,
            results,
            started,
            error,
            self.strategy,
            had_action_failures,
        )
    }
}
