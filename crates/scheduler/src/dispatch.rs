//! Resolving and running one scheduled fire.

use std::sync::Arc;

use async_trait::async_trait;
use autoqliq_core::AutomationError;
use autoqliq_credential::CredentialStore;
use autoqliq_driver::{DriverManager, DriverOptions};
use autoqliq_engine::{ErrorStrategy, ExecutionLog, WorkflowRunner};
use autoqliq_workflow::WorkflowRepository;

/// Turns a fire into a workflow run.
///
/// The scheduler only knows this contract; tests substitute a stub with
/// controllable latency, and embedders can route fires into their own
/// run infrastructure.
#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    /// Resolve and execute `workflow_name`, returning its log.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError`] when the workflow or credential
    /// cannot be resolved; a run that starts always yields a log.
    async fn dispatch(
        &self,
        workflow_name: &str,
        credential_name: Option<&str>,
    ) -> Result<ExecutionLog, AutomationError>;
}

/// Default dispatcher: a fresh [`WorkflowRunner`] per fire.
///
/// Each fire acquires its own driver session through the shared
/// lifecycle manager, so scheduled runs have exactly the semantics and
/// isolation of manual ones.
pub struct RunnerDispatcher {
    driver_manager: Arc<DriverManager>,
    driver_options: DriverOptions,
    workflows: Arc<dyn WorkflowRepository>,
    credentials: Arc<dyn CredentialStore>,
    strategy: ErrorStrategy,
}

impl RunnerDispatcher {
    /// Create a dispatcher.
    pub fn new(
        driver_manager: Arc<DriverManager>,
        driver_options: DriverOptions,
        workflows: Arc<dyn WorkflowRepository>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            driver_manager,
            driver_options,
            workflows,
            credentials,
            strategy: ErrorStrategy::default(),
        }
    }

    /// Set the error strategy scheduled runs execute under.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[async_trait]
impl WorkflowDispatcher for RunnerDispatcher {
    async fn dispatch(
        &self,
        workflow_name: &str,
        credential_name: Option<&str>,
    ) -> Result<ExecutionLog, AutomationError> {
        let actions = self.workflows.load(workflow_name).await?;

        if let Some(name) = credential_name {
            if self.credentials.get(name).await?.is_none() {
                return Err(AutomationError::credential_named(
                    name,
                    format!("credential not found: {name}"),
                ));
            }
        }

        let runner = WorkflowRunner::new(
            self.driver_manager.clone(),
            self.driver_options.clone(),
            self.credentials.clone(),
            self.workflows.clone(),
        )
        .with_strategy(self.strategy);

        Ok(runner.run(&actions, workflow_name).await)
    }
}
