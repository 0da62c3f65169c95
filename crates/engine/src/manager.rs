//! Sequential action orchestration.

use std::pin::Pin;
use std::sync::Arc;

use autoqliq_action::{Action, ActionResult};
use autoqliq_core::AutomationError;
use autoqliq_workflow::WorkflowRepository;

use crate::context::ExecutionContext;
use crate::executor::ActionExecutor;
use crate::strategy::ErrorStrategy;

/// Orchestrates a sequence of actions.
///
/// Per step: observe the cancellation signal, dispatch (control flow to
/// the handlers in [`crate::control_flow`], leaves to the
/// [`ActionExecutor`]), collect the result, and apply the error
/// strategy. The manager never swallows an error a handler raises; only
/// failures reported as results are subject to the strategy.
pub struct ExecutionManager {
    pub(crate) executor: ActionExecutor,
    pub(crate) templates: Arc<dyn WorkflowRepository>,
    strategy: ErrorStrategy,
}

impl ExecutionManager {
    /// Create a manager.
    pub fn new(
        executor: ActionExecutor,
        templates: Arc<dyn WorkflowRepository>,
        strategy: ErrorStrategy,
    ) -> Self {
        Self {
            executor,
            templates,
            strategy,
        }
    }

    /// The configured error strategy.
    #[must_use]
    pub fn strategy(&self) -> ErrorStrategy {
        self.strategy
    }

    /// Execute `actions` in order, appending each outcome to `results`.
    ///
    /// Results accumulate in the caller-owned vector so partial progress
    /// survives an abort; the final ordering equals execution order.
    /// Control-flow bodies re-enter this method with an extended
    /// `log_prefix` and incremented `depth`.
    ///
    /// # Errors
    ///
    /// The stopped-by-user [`AutomationError::Workflow`] when the
    /// cancellation signal fires, or an [`AutomationError::Action`]
    /// wrapping the failing step under [`ErrorStrategy::StopOnError`].
    pub fn execute_actions<'a>(
        &'a self,
        actions: &'a [Action],
        ctx: &'a ExecutionContext,
        results: &'a mut Vec<ActionResult>,
        log_prefix: &'a str,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<(), AutomationError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(
                workflow = %ctx.workflow_name,
                count = actions.len(),
                "{log_prefix}executing action sequence"
            );

            for (index, action) in actions.iter().enumerate() {
                ctx.check_cancelled()?;

                let step = if log_prefix.is_empty() {
                    format!("Step {}", index + 1)
                } else {
                    format!("{log_prefix} > Step {}", index + 1)
                };
                tracing::debug!("{step}: {}", action.display_name());

                let result = if action.is_control_flow() {
                    self.dispatch_control_flow(action, ctx, &step, depth).await?
                } else {
                    self.executor.execute_action(action, ctx).await?
                };

                let failed = !result.is_success();
                let message = result.message.clone();
                results.push(result);

                if failed {
                    ctx.mark_action_failure();
                    match self.strategy {
                        ErrorStrategy::StopOnError => {
                            tracing::error!("{step}: {} failed: {message}", action.display_name());
                            return Err(AutomationError::action(action.name(), message));
                        }
                        ErrorStrategy::ContinueOnError => {
                            tracing::warn!(
                                "{step}: {} failed, continuing: {message}",
                                action.display_name()
                            );
                        }
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoqliq_credential::MemoryCredentialStore;
    use autoqliq_driver::{ScriptedDriver, ScriptedDriverHandle, WebDriver};
    use autoqliq_workflow::MemoryWorkflowRepository;
    use pretty_assertions::assert_eq;

    fn manager_with(
        driver: ScriptedDriver,
        strategy: ErrorStrategy,
    ) -> (ExecutionManager, ScriptedDriverHandle) {
        let handle = driver.handle();
        let driver: Arc<dyn WebDriver> = Arc::new(driver);
        let executor = ActionExecutor::new(driver, Arc::new(MemoryCredentialStore::new()));
        let manager = ExecutionManager::new(
            executor,
            Arc::new(MemoryWorkflowRepository::new()),
            strategy,
        );
        (manager, handle)
    }

    fn nav(url: &str) -> Action {
        Action::Navigate {
            name: String::new(),
            url: url.into(),
        }
    }

    fn click(selector: &str) -> Action {
        Action::Click {
            name: String::new(),
            selector: selector.into(),
            check_success_selector: None,
            check_failure_selector: None,
        }
    }

    #[tokio::test]
    async fn all_successes_collect_in_order() {
        let (manager, handle) =
            manager_with(ScriptedDriver::with_elements(["#a"]), ErrorStrategy::StopOnError);
        let ctx = ExecutionContext::new("wf");
        let actions = vec![nav("https://x"), click("#a")];
        let mut results = Vec::new();

        manager
            .execute_actions(&actions, &ctx, &mut results, "", 0)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(ActionResult::is_success));
        assert!(!ctx.had_action_failures());
        assert_eq!(handle.calls(), vec!["navigate https://x", "click #a"]);
    }

    #[tokio::test]
    async fn stop_on_error_raises_and_keeps_partial_results() {
        let (manager, _) = manager_with(ScriptedDriver::new(), ErrorStrategy::StopOnError);
        let ctx = ExecutionContext::new("wf");
        let actions = vec![nav("https://x"), click("#missing"), nav("https://y")];
        let mut results = Vec::new();

        let err = manager
            .execute_actions(&actions, &ctx, &mut results, "", 0)
            .await
            .unwrap_err();

        assert!(matches!(err, AutomationError::Action { .. }));
        assert_eq!(results.len(), 2);
        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(ctx.had_action_failures());
    }

    #[tokio::test]
    async fn continue_on_error_runs_every_step() {
        let (manager, _) = manager_with(ScriptedDriver::new(), ErrorStrategy::ContinueOnError);
        let ctx = ExecutionContext::new("wf");
        let actions = vec![nav("https://x"), click("#missing"), nav("https://y")];
        let mut results = Vec::new();

        manager
            .execute_actions(&actions, &ctx, &mut results, "", 0)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(!results[1].is_success());
        assert!(ctx.had_action_failures());
    }

    #[tokio::test]
    async fn cancellation_is_observed_before_each_step() {
        let (manager, handle) = manager_with(ScriptedDriver::new(), ErrorStrategy::StopOnError);
        let ctx = ExecutionContext::new("wf");
        ctx.cancellation.cancel();
        let actions = vec![nav("https://x")];
        let mut results = Vec::new();

        let err = manager
            .execute_actions(&actions, &ctx, &mut results, "", 0)
            .await
            .unwrap_err();

        assert!(err.is_stop_request());
        assert!(results.is_empty());
        assert!(handle.calls().is_empty());
    }
}
