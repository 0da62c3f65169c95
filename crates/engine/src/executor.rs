//! Leaf action execution.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use autoqliq_action::{Action, ActionResult, Condition, ValueSource};
use autoqliq_core::AutomationError;
use autoqliq_credential::{CredentialKey, CredentialStore, resolve_field};
use autoqliq_driver::{DriverError, WebDriver};

use crate::context::ExecutionContext;

/// Validates and executes a single leaf action against the driver.
///
/// Every backend fault, validation rejection, and credential problem is
/// converted into a failure [`ActionResult`] carrying a stable
/// `error_type` tag; faults never bubble past the executor. The only
/// error this type ever returns is the stopped-by-user signal, raised
/// when cancellation fires during a driver operation or wait.
pub struct ActionExecutor {
    driver: Arc<dyn WebDriver>,
    credentials: Arc<dyn CredentialStore>,
}

impl ActionExecutor {
    /// Create an executor around a driver handle and credential store.
    pub fn new(driver: Arc<dyn WebDriver>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            driver,
            credentials,
        }
    }

    /// Validate and execute one action.
    ///
    /// # Errors
    ///
    /// Only the stopped-by-user [`AutomationError::Workflow`]; everything
    /// else is reported as a failure result.
    pub async fn execute_action(
        &self,
        action: &Action,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        tracing::debug!(action = %action.display_name(), "executing action");

        if let Err(e) = action.validate() {
            return Ok(
                ActionResult::failure(format!("Validation failed: {e}"))
                    .with_error_type("validation_error"),
            );
        }

        let result = match action {
            Action::Navigate { url, .. } => self.navigate(url, ctx).await?,
            Action::Click {
                selector,
                check_success_selector,
                check_failure_selector,
                ..
            } => {
                self.click(
                    selector,
                    check_success_selector.as_deref(),
                    check_failure_selector.as_deref(),
                    ctx,
                )
                .await?
            }
            Action::Type {
                selector,
                value_source,
                value_key,
                ..
            } => {
                self.type_value(selector, *value_source, value_key, ctx)
                    .await?
            }
            Action::Wait {
                duration_seconds, ..
            } => self.wait(*duration_seconds, ctx).await?,
            Action::Screenshot { file_path, .. } => self.screenshot(file_path, ctx).await?,
            Action::Conditional { .. }
            | Action::Loop { .. }
            | Action::ErrorHandling { .. }
            | Action::Template { .. } => ActionResult::failure(format!(
                "implementation error: control-flow action '{}' dispatched to the leaf executor",
                action.name()
            ))
            .with_error_type("unexpected_error"),
        };

        if result.is_success() {
            tracing::debug!(action = %action.display_name(), "action succeeded: {}", result.message);
        } else {
            tracing::warn!(action = %action.display_name(), "action failed: {}", result.message);
        }
        Ok(result)
    }

    /// Evaluate a condition against live driver state.
    ///
    /// The outer error is the stopped-by-user signal; the inner error is
    /// a driver fault the caller converts into a failure result.
    ///
    /// # Errors
    ///
    /// See above; never errors for an ordinary `false` outcome.
    pub async fn evaluate_condition(
        &self,
        condition: &Condition,
        ctx: &ExecutionContext,
    ) -> Result<Result<bool, DriverError>, AutomationError> {
        match condition {
            Condition::ElementPresent { selector } => {
                self.guarded(ctx, self.driver.is_element_present(selector))
                    .await
            }
            Condition::ElementAbsent { selector } => Ok(self
                .guarded(ctx, self.driver.is_element_present(selector))
                .await?
                .map(|present| !present)),
            Condition::UrlContains { needle } => Ok(self
                .guarded(ctx, self.driver.current_url())
                .await?
                .map(|url| url.contains(needle))),
            Condition::TitleContains { needle } => Ok(self
                .guarded(ctx, self.driver.title())
                .await?
                .map(|title| title.contains(needle))),
            Condition::VariableEquals { key, value } => Ok(Ok(ctx
                .get_variable(key)
                .is_some_and(|current| current == *value))),
        }
    }

    /// Race a driver or store operation against the cancellation signal.
    ///
    /// Cancellation wins ties so a stop request is observed promptly
    /// even while a driver wait is pending.
    async fn guarded<T, E>(
        &self,
        ctx: &ExecutionContext,
        op: impl Future<Output = Result<T, E>>,
    ) -> Result<Result<T, E>, AutomationError> {
        tokio::select! {
            biased;
            () = ctx.cancellation.cancelled() => Err(AutomationError::stopped_by_user()),
            result = op => Ok(result),
        }
    }

    async fn navigate(
        &self,
        url: &str,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        let outcome = self.guarded(ctx, self.driver.navigate(url)).await?;
        Ok(match outcome {
            Ok(()) => ActionResult::success(format!("Navigated to {url}")),
            Err(e) => driver_failure(format!("Failed to navigate to {url}"), &e),
        })
    }

    async fn click(
        &self,
        selector: &str,
        check_success: Option<&str>,
        check_failure: Option<&str>,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        if let Err(e) = self.guarded(ctx, self.driver.click(selector)).await? {
            return Ok(driver_failure(
                format!("Failed to click element {selector}"),
                &e,
            ));
        }

        // Post-click probes: a configured success indicator must appear,
        // and a configured failure indicator must not.
        if let Some(success_selector) = check_success {
            let present = match self
                .guarded(ctx, self.driver.is_element_present(success_selector))
                .await?
            {
                Ok(present) => present,
                Err(e) => {
                    return Ok(driver_failure(
                        format!("Failed to probe success indicator {success_selector}"),
                        &e,
                    ));
                }
            };
            if !present {
                if let Some(failure_selector) = check_failure {
                    let failed = self
                        .guarded(ctx, self.driver.is_element_present(failure_selector))
                        .await?
                        .unwrap_or(false);
                    if failed {
                        return Ok(ActionResult::failure(format!(
                            "Click on {selector} failed: failure indicator '{failure_selector}' is present"
                        ))
                        .with_error_type("action_error"));
                    }
                }
                return Ok(ActionResult::failure(format!(
                    "Click on {selector} failed: success indicator '{success_selector}' is absent"
                ))
                .with_error_type("action_error"));
            }
        }

        Ok(ActionResult::success(format!("Clicked element {selector}")))
    }

    async fn type_value(
        &self,
        selector: &str,
        value_source: ValueSource,
        value_key: &str,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        let value = match value_source {
            ValueSource::Literal => value_key.to_owned(),
            ValueSource::Credential => {
                let key = match CredentialKey::parse(value_key) {
                    Ok(key) => key,
                    Err(e) => {
                        return Ok(ActionResult::failure(e.to_string())
                            .with_error_type("action_error"));
                    }
                };
                let resolution = self
                    .guarded(ctx, resolve_field(self.credentials.as_ref(), &key))
                    .await?;
                match resolution {
                    Ok(value) => value,
                    Err(e) => {
                        return Ok(ActionResult::failure(e.to_string())
                            .with_error_type("action_error"));
                    }
                }
            }
        };

        Ok(
            match self
                .guarded(ctx, self.driver.type_text(selector, &value))
                .await?
            {
                Ok(()) => ActionResult::success(format!("Typed text into element {selector}")),
                Err(e) => driver_failure(format!("Failed to type into element {selector}"), &e),
            },
        )
    }

    async fn wait(
        &self,
        duration_seconds: u64,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        tokio::select! {
            biased;
            () = ctx.cancellation.cancelled() => Err(AutomationError::stopped_by_user()),
            () = tokio::time::sleep(Duration::from_secs(duration_seconds)) => {
                Ok(ActionResult::success(format!("Waited for {duration_seconds} seconds")))
            }
        }
    }

    async fn screenshot(
        &self,
        file_path: &str,
        ctx: &ExecutionContext,
    ) -> Result<ActionResult, AutomationError> {
        let outcome = self
            .guarded(ctx, self.driver.screenshot(Path::new(file_path)))
            .await?;
        Ok(match outcome {
            Ok(()) => ActionResult::success(format!("Took screenshot and saved to {file_path}")),
            Err(e) => driver_failure(format!("Failed to take screenshot to {file_path}"), &e),
        })
    }
}

/// Convert a driver fault into a tagged failure result.
fn driver_failure(context: String, e: &DriverError) -> ActionResult {
    ActionResult::failure_with_cause(format!("{context}: {e}"), serde_json::Map::new(), e)
        .with_error_type(e.error_type())
}
