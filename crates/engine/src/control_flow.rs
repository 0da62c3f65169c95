//! Control-flow handlers: conditional, loop, error handling, template.
//!
//! Each handler recurses into
//! [`ExecutionManager::execute_actions`] with an extended log prefix, so
//! nested step paths read like `Step 3 > Cond[true] > Step 1`. A
//! handler's result carries the sub-results of whatever branch it
//! executed in its `data`; only stop requests propagate as errors.

use autoqliq_action::{Action, ActionResult, Condition, LoopIterator, MAX_LOOP_ITERATIONS,
    MAX_NESTING_DEPTH};
use autoqliq_core::AutomationError;
use serde_json::{Map, Value, json};

use crate::context::ExecutionContext;
use crate::manager::ExecutionManager;

/// Serialize sub-results for a handler's `data` payload.
fn results_value(results: &[ActionResult]) -> Value {
    serde_json::to_value(results).unwrap_or(Value::Null)
}

fn count_failures(results: &[ActionResult]) -> usize {
    results.iter().filter(|r| !r.is_success()).count()
}

impl ExecutionManager {
    /// Validate and dispatch a control-flow action to its handler.
    pub(crate) async fn dispatch_control_flow(
        &self,
        action: &Action,
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        if let Err(e) = action.validate() {
            return Ok(ActionResult::failure(format!("Validation failed: {e}"))
                .with_error_type("validation_error"));
        }
        if depth >= MAX_NESTING_DEPTH {
            return Ok(ActionResult::failure(format!(
                "control-flow nesting exceeds {MAX_NESTING_DEPTH} levels"
            ))
            .with_error_type("action_error"));
        }

        match action {
            Action::Conditional {
                condition,
                true_branch,
                false_branch,
                ..
            } => {
                self.handle_conditional(condition, true_branch, false_branch, ctx, step, depth)
                    .await
            }
            Action::Loop { iterator, body, .. } => {
                self.handle_loop(iterator, body, ctx, step, depth).await
            }
            Action::ErrorHandling {
                try_branch,
                catch_branch,
                ..
            } => {
                self.handle_error_handling(try_branch, catch_branch, ctx, step, depth)
                    .await
            }
            Action::Template { template_name, .. } => {
                self.handle_template(template_name, ctx, step, depth).await
            }
            other => Ok(ActionResult::failure(format!(
                "implementation error: leaf action '{}' dispatched to control flow",
                other.name()
            ))
            .with_error_type("unexpected_error")),
        }
    }

    /// Evaluate the condition, execute the chosen branch, and report
    /// which branch ran and how many children it had.
    async fn handle_conditional(
        &self,
        condition: &Condition,
        true_branch: &[Action],
        false_branch: &[Action],
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        let held = match self.executor.evaluate_condition(condition, ctx).await? {
            Ok(held) => held,
            Err(e) => {
                return Ok(ActionResult::failure_with_cause(
                    format!("Condition evaluation failed ({}): {e}", condition.describe()),
                    Map::new(),
                    &e,
                )
                .with_error_type(e.error_type()));
            }
        };

        let (label, branch) = if held {
            ("true", true_branch)
        } else {
            ("false", false_branch)
        };
        tracing::info!("{step}: condition {} -> {label} branch", condition.describe());

        let child_prefix = format!("{step} > Cond[{label}]");
        let mut branch_results = Vec::new();
        let outcome = self
            .execute_actions(branch, ctx, &mut branch_results, &child_prefix, depth + 1)
            .await;

        let executed = branch_results.len();
        let mut data = Map::new();
        data.insert("branch".into(), json!(label));
        data.insert("branch_results".into(), results_value(&branch_results));

        match outcome {
            Ok(()) => {
                let failures = count_failures(&branch_results);
                if failures == 0 {
                    Ok(ActionResult::success_with_data(
                        format!("Condition {label}: executed {executed} action(s) in {label} branch"),
                        data,
                    ))
                } else {
                    Ok(ActionResult::failure_with_data(
                        format!(
                            "Condition {label}: {failures} of {executed} action(s) failed in {label} branch"
                        ),
                        data,
                    )
                    .with_error_type("action_error"))
                }
            }
            Err(e) if e.is_stop_request() => Err(e),
            Err(e) => Ok(ActionResult::failure_with_data(
                format!("Condition {label}: {label} branch failed: {e}"),
                data,
            )
            .with_error_type("action_error")),
        }
    }

    /// Iterate the body, enforcing the iteration cap, and report how
    /// many iterations completed.
    async fn handle_loop(
        &self,
        iterator: &LoopIterator,
        body: &[Action],
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        let mut completed: u64 = 0;
        let mut iterations_with_failures: u64 = 0;

        loop {
            ctx.check_cancelled()?;

            if completed >= MAX_LOOP_ITERATIONS {
                let mut data = Map::new();
                data.insert("iterations".into(), json!(completed));
                return Ok(ActionResult::failure_with_data(
                    format!("loop cap exceeded after {MAX_LOOP_ITERATIONS} iterations"),
                    data,
                )
                .with_error_type("action_error"));
            }

            match iterator {
                LoopIterator::Count { times } => {
                    if completed >= *times {
                        break;
                    }
                }
                LoopIterator::While { condition } => {
                    match self.executor.evaluate_condition(condition, ctx).await? {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            let mut data = Map::new();
                            data.insert("iterations".into(), json!(completed));
                            return Ok(ActionResult::failure_with_cause(
                                format!(
                                    "Loop condition evaluation failed ({}): {e}",
                                    condition.describe()
                                ),
                                data,
                                &e,
                            )
                            .with_error_type(e.error_type()));
                        }
                    }
                }
            }

            let iteration = completed + 1;
            let iter_prefix = format!("{step} > Loop [iter {iteration}]");
            let mut body_results = Vec::new();
            let outcome = self
                .execute_actions(body, ctx, &mut body_results, &iter_prefix, depth + 1)
                .await;

            match outcome {
                Ok(()) => {
                    if count_failures(&body_results) > 0 {
                        iterations_with_failures += 1;
                    }
                    completed = iteration;
                }
                Err(e) if e.is_stop_request() => return Err(e),
                Err(e) => {
                    let mut data = Map::new();
                    data.insert("iterations".into(), json!(completed));
                    data.insert("iteration_results".into(), results_value(&body_results));
                    return Ok(ActionResult::failure_with_data(
                        format!("Loop body failed at iteration {iteration}: {e}"),
                        data,
                    )
                    .with_error_type("action_error"));
                }
            }
        }

        let mut data = Map::new();
        data.insert("iterations".into(), json!(completed));
        if iterations_with_failures > 0 {
            Ok(ActionResult::failure_with_data(
                format!(
                    "Loop completed {completed} iteration(s) with failures in {iterations_with_failures}"
                ),
                data,
            )
            .with_error_type("action_error"))
        } else {
            Ok(ActionResult::success_with_data(
                format!("Loop completed {completed} iteration(s)"),
                data,
            ))
        }
    }

    /// Run the try body; on failure run the catch body. Succeeds when
    /// the try body fully succeeded or the catch body recovered.
    async fn handle_error_handling(
        &self,
        try_branch: &[Action],
        catch_branch: &[Action],
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        let mut try_results = Vec::new();
        let try_outcome = self
            .execute_actions(
                try_branch,
                ctx,
                &mut try_results,
                &format!("{step} > Try"),
                depth + 1,
            )
            .await;

        let try_failed = match try_outcome {
            Ok(()) => count_failures(&try_results) > 0,
            Err(e) if e.is_stop_request() => return Err(e),
            Err(_) => true,
        };

        let mut data = Map::new();
        data.insert("try_results".into(), results_value(&try_results));

        if !try_failed {
            data.insert("branch".into(), json!("try"));
            return Ok(ActionResult::success_with_data(
                format!(
                    "Try body succeeded: executed {} action(s)",
                    try_results.len()
                ),
                data,
            ));
        }

        tracing::info!("{step}: try body failed, running catch body");
        let mut catch_results = Vec::new();
        let catch_outcome = self
            .execute_actions(
                catch_branch,
                ctx,
                &mut catch_results,
                &format!("{step} > Catch"),
                depth + 1,
            )
            .await;

        data.insert("branch".into(), json!("catch"));
        data.insert("catch_results".into(), results_value(&catch_results));

        match catch_outcome {
            Ok(()) => {
                let failures = count_failures(&catch_results);
                if failures == 0 {
                    Ok(ActionResult::success_with_data(
                        format!(
                            "Try body failed; catch body recovered with {} action(s)",
                            catch_results.len()
                        ),
                        data,
                    ))
                } else {
                    Ok(ActionResult::failure_with_data(
                        format!(
                            "Try body failed and {failures} of {} catch action(s) failed",
                            catch_results.len()
                        ),
                        data,
                    )
                    .with_error_type("action_error"))
                }
            }
            Err(e) if e.is_stop_request() => Err(e),
            Err(e) => Ok(ActionResult::failure_with_data(
                format!("Catch body failed: {e}"),
                data,
            )
            .with_error_type("action_error")),
        }
    }

    /// Expand a stored workflow in place, rejecting expansion cycles.
    async fn handle_template(
        &self,
        template_name: &str,
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        if let Err(cycle) = ctx.enter_template(template_name) {
            return Ok(
                ActionResult::failure(format!("template cycle: {cycle}"))
                    .with_error_type("action_error"),
            );
        }

        let outcome = self.expand_template(template_name, ctx, step, depth).await;
        ctx.exit_template(template_name);
        outcome
    }

    async fn expand_template(
        &self,
        template_name: &str,
        ctx: &ExecutionContext,
        step: &str,
        depth: usize,
    ) -> Result<ActionResult, AutomationError> {
        let actions = match self.templates.load(template_name).await {
            Ok(actions) => actions,
            Err(e) => {
                return Ok(ActionResult::failure(format!(
                    "Template '{template_name}' could not be loaded: {e}"
                ))
                .with_error_type("action_error"));
            }
        };

        let child_prefix = format!("{step} > Template '{template_name}'");
        let mut sub_results = Vec::new();
        let outcome = self
            .execute_actions(&actions, ctx, &mut sub_results, &child_prefix, depth + 1)
            .await;

        let executed = sub_results.len();
        let mut data = Map::new();
        data.insert("template".into(), json!(template_name));
        data.insert("template_results".into(), results_value(&sub_results));

        match outcome {
            Ok(()) => {
                let failures = count_failures(&sub_results);
                if failures == 0 {
                    Ok(ActionResult::success_with_data(
                        format!("Template '{template_name}' executed {executed} action(s)"),
                        data,
                    ))
                } else {
                    Ok(ActionResult::failure_with_data(
                        format!(
                            "Template '{template_name}': {failures} of {executed} action(s) failed"
                        ),
                        data,
                    )
                    .with_error_type("action_error"))
                }
            }
            Err(e) if e.is_stop_request() => Err(e),
            Err(e) => Ok(ActionResult::failure_with_data(
                format!("Template '{template_name}' failed: {e}"),
                data,
            )
            .with_error_type("action_error")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ActionExecutor;
    use crate::strategy::ErrorStrategy;
    use autoqliq_credential::MemoryCredentialStore;
    use autoqliq_driver::{ScriptedDriver, ScriptedDriverHandle, WebDriver};
    use autoqliq_workflow::{MemoryWorkflowRepository, Workflow};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

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

    fn build_manager(
        driver: ScriptedDriver,
        templates: MemoryWorkflowRepository,
        strategy: ErrorStrategy,
    ) -> (ExecutionManager, ScriptedDriverHandle) {
        let handle = driver.handle();
        let driver: Arc<dyn WebDriver> = Arc::new(driver);
        let executor = ActionExecutor::new(driver, Arc::new(MemoryCredentialStore::new()));
        (
            ExecutionManager::new(executor, Arc::new(templates), strategy),
            handle,
        )
    }

    async fn run_one(
        manager: &ExecutionManager,
        action: Action,
        ctx: &ExecutionContext,
    ) -> Result<Vec<ActionResult>, AutomationError> {
        let mut results = Vec::new();
        manager
            .execute_actions(std::slice::from_ref(&action), ctx, &mut results, "", 0)
            .await?;
        Ok(results)
    }

    #[tokio::test]
    async fn conditional_true_branch_executes_and_reports() {
        let (manager, _) = build_manager(
            ScriptedDriver::with_elements(["#flag"]),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Conditional {
            name: String::new(),
            condition: Condition::ElementPresent { selector: "#flag".into() },
            true_branch: vec![nav("https://example.com")],
            false_branch: vec![],
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.is_success());
        assert!(result.message.contains("true branch"));
        let branch_results = result.data.get("branch_results").unwrap();
        assert_eq!(branch_results.as_array().unwrap().len(), 1);
        assert_eq!(branch_results[0]["status"], "success");
    }

    #[tokio::test]
    async fn conditional_empty_false_branch_succeeds_with_zero_children() {
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Conditional {
            name: String::new(),
            condition: Condition::ElementPresent { selector: "#flag".into() },
            true_branch: vec![nav("https://example.com")],
            false_branch: vec![],
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let result = &results[0];
        assert!(result.is_success());
        assert!(result.message.contains("executed 0 action(s) in false branch"));
    }

    #[tokio::test]
    async fn conditional_failing_branch_fails_the_conditional() {
        let (manager, _) = build_manager(
            ScriptedDriver::with_elements(["#flag"]),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Conditional {
            name: String::new(),
            condition: Condition::ElementPresent { selector: "#flag".into() },
            true_branch: vec![click("#missing")],
            false_branch: vec![],
        };

        // Under stop-on-error the conditional's failure aborts the run.
        let mut results = Vec::new();
        let err = manager
            .execute_actions(
                std::slice::from_ref(&action),
                &ctx,
                &mut results,
                "",
                0,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AutomationError::Action { .. }));
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_success());
    }

    #[tokio::test]
    async fn count_loop_runs_body_n_times() {
        let (manager, handle) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Loop {
            name: String::new(),
            iterator: LoopIterator::Count { times: 3 },
            body: vec![nav("https://example.com/page")],
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let result = &results[0];
        assert!(result.is_success());
        assert_eq!(result.data.get("iterations").unwrap(), &json!(3));
        assert_eq!(handle.calls().len(), 3);
    }

    #[tokio::test]
    async fn while_loop_stops_when_condition_clears() {
        let (manager, handle) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        // The body navigates away from /start, clearing the condition
        // after exactly one iteration.
        let actions = vec![
            nav("https://example.com/start"),
            Action::Loop {
                name: String::new(),
                iterator: LoopIterator::While {
                    condition: Condition::UrlContains { needle: "/start".into() },
                },
                body: vec![nav("https://example.com/done")],
            },
        ];

        let mut results = Vec::new();
        manager
            .execute_actions(&actions, &ctx, &mut results, "", 0)
            .await
            .unwrap();

        let result = &results[1];
        assert!(result.is_success());
        assert_eq!(result.data.get("iterations").unwrap(), &json!(1));
        assert_eq!(handle.current_url(), "https://example.com/done");
    }

    #[tokio::test]
    async fn while_loop_hits_the_iteration_cap() {
        let (manager, _) = build_manager(
            ScriptedDriver::with_elements(["#spinner", "#next"]),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Loop {
            name: String::new(),
            iterator: LoopIterator::While {
                condition: Condition::ElementPresent { selector: "#spinner".into() },
            },
            body: vec![click("#next")],
        };

        let mut results = Vec::new();
        let err = manager
            .execute_actions(
                std::slice::from_ref(&action),
                &ctx,
                &mut results,
                "",
                0,
            )
            .await
            .unwrap_err();
        // The cap failure aborts under stop-on-error, wrapping the loop.
        assert!(matches!(err, AutomationError::Action { .. }));
        assert_eq!(results.len(), 1);
        assert!(results[0].message.contains("loop cap exceeded"));
        assert_eq!(
            results[0].data.get("iterations").unwrap(),
            &json!(MAX_LOOP_ITERATIONS)
        );
    }

    #[tokio::test]
    async fn loop_body_failure_reports_the_iteration() {
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Loop {
            name: String::new(),
            iterator: LoopIterator::Count { times: 5 },
            body: vec![click("#missing")],
        };

        let mut results = Vec::new();
        let err = manager
            .execute_actions(
                std::slice::from_ref(&action),
                &ctx,
                &mut results,
                "",
                0,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AutomationError::Action { .. }));
        assert!(results[0].message.contains("Loop body failed at iteration 1"));
        assert_eq!(results[0].data.get("iterations").unwrap(), &json!(0));
    }

    #[tokio::test]
    async fn error_handling_skips_catch_when_try_succeeds() {
        let (manager, handle) = build_manager(
            ScriptedDriver::with_elements(["#safe"]),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::ErrorHandling {
            name: String::new(),
            try_branch: vec![click("#safe")],
            catch_branch: vec![nav("https://example.com/recover")],
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let result = &results[0];
        assert!(result.is_success());
        assert_eq!(result.data.get("branch").unwrap(), &json!("try"));
        assert!(result.data.get("catch_results").is_none());
        assert_eq!(handle.calls(), vec!["click #safe"]);
    }

    #[tokio::test]
    async fn error_handling_recovers_through_catch() {
        let (manager, handle) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::ErrorHandling {
            name: String::new(),
            try_branch: vec![click("#broken")],
            catch_branch: vec![nav("https://example.com/recover")],
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let result = &results[0];
        assert!(result.is_success());
        assert_eq!(result.data.get("branch").unwrap(), &json!("catch"));
        assert!(result.message.contains("catch body recovered"));
        assert_eq!(
            handle.calls(),
            vec!["click #broken", "navigate https://example.com/recover"]
        );
    }

    #[tokio::test]
    async fn error_handling_fails_when_catch_also_fails() {
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::ErrorHandling {
            name: String::new(),
            try_branch: vec![click("#broken")],
            catch_branch: vec![click("#also-broken")],
        };

        let mut results = Vec::new();
        let err = manager
            .execute_actions(
                std::slice::from_ref(&action),
                &ctx,
                &mut results,
                "",
                0,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AutomationError::Action { .. }));
        assert!(!results[0].is_success());
        assert_eq!(results[0].data.get("branch").unwrap(), &json!("catch"));
    }

    #[tokio::test]
    async fn template_expands_stored_workflow_in_place() {
        let templates = MemoryWorkflowRepository::with_workflows([Workflow::new(
            "login",
            vec![nav("https://example.com/login"), click("#submit")],
        )]);
        let (manager, handle) = build_manager(
            ScriptedDriver::with_elements(["#submit"]),
            templates,
            ErrorStrategy::StopOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Template {
            name: String::new(),
            template_name: "login".into(),
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let result = &results[0];
        assert!(result.is_success());
        assert!(result.message.contains("executed 2 action(s)"));
        assert_eq!(
            handle.calls(),
            vec!["navigate https://example.com/login", "click #submit"]
        );
    }

    #[tokio::test]
    async fn missing_template_fails_the_action() {
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            MemoryWorkflowRepository::new(),
            ErrorStrategy::ContinueOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Template {
            name: String::new(),
            template_name: "ghost".into(),
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        assert!(!results[0].is_success());
        assert!(results[0].message.contains("could not be loaded"));
    }

    #[tokio::test]
    async fn template_cycle_is_rejected() {
        // a expands b, b expands a.
        let templates = MemoryWorkflowRepository::with_workflows([
            Workflow::new(
                "a",
                vec![Action::Template {
                    name: String::new(),
                    template_name: "b".into(),
                }],
            ),
            Workflow::new(
                "b",
                vec![Action::Template {
                    name: String::new(),
                    template_name: "a".into(),
                }],
            ),
        ]);
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            templates,
            ErrorStrategy::ContinueOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Template {
            name: String::new(),
            template_name: "a".into(),
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let rendered = serde_json::to_string(&results[0]).unwrap();
        assert!(rendered.contains("template cycle: a -> b -> a"));

        // The detector resets between runs: a fresh context can expand
        // the same template again.
        let fresh = ExecutionContext::new("wf2");
        assert!(fresh.enter_template("a").is_ok());
    }

    #[tokio::test]
    async fn runaway_dynamic_nesting_is_cut_off() {
        // A template that expands itself through the repository would
        // recurse forever without the cycle guard; a chain of distinct
        // templates is instead cut off by the depth guard.
        let workflows: Vec<Workflow> = (0..=MAX_NESTING_DEPTH + 1)
            .map(|i| {
                Workflow::new(
                    format!("t{i}"),
                    vec![Action::Template {
                        name: String::new(),
                        template_name: format!("t{}", i + 1),
                    }],
                )
            })
            .collect();
        let templates = MemoryWorkflowRepository::with_workflows(workflows);
        let (manager, _) = build_manager(
            ScriptedDriver::new(),
            templates,
            ErrorStrategy::ContinueOnError,
        );
        let ctx = ExecutionContext::new("wf");
        let action = Action::Template {
            name: String::new(),
            template_name: "t0".into(),
        };

        let results = run_one(&manager, action, &ctx).await.unwrap();
        let rendered = serde_json::to_string(&results[0]).unwrap();
        assert!(rendered.contains("nesting exceeds"));
    }
}
