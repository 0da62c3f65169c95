//! Per-run execution context.

use std::sync::Arc;

use autoqliq_core::{AutomationError, ExecutionId};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// Mutable coordination state threaded through one run.
///
/// Carries the workflow name, the cancellation signal, run variables,
/// the `had_action_failures` flag, and the active-template stack used to
/// break template expansion cycles. It is owned by exactly one run and
/// is NOT the channel for dependency injection: the driver and the
/// credential store are injected into the executor directly.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Unique identifier of this run.
    pub execution_id: ExecutionId,
    /// Name of the workflow being executed.
    pub workflow_name: String,
    /// Cooperative cancellation signal shared with the submitter.
    pub cancellation: CancellationToken,
    variables: RwLock<serde_json::Map<String, serde_json::Value>>,
    had_action_failures: RwLock<bool>,
    active_templates: Mutex<Vec<String>>,
}

impl ExecutionContext {
    /// Create a context for one run of `workflow_name`.
    #[must_use]
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            execution_id: ExecutionId::v4(),
            workflow_name: workflow_name.into(),
            cancellation: CancellationToken::new(),
            variables: RwLock::new(serde_json::Map::new()),
            had_action_failures: RwLock::new(false),
            active_templates: Mutex::new(Vec::new()),
        }
    }

    /// Use a pre-existing cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Wrap into the shared form the pipeline passes around.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Raise the stop error if cancellation has been requested.
    ///
    /// # Errors
    ///
    /// Returns the canonical stopped-by-user [`AutomationError::Workflow`].
    pub fn check_cancelled(&self) -> Result<(), AutomationError> {
        if self.cancellation.is_cancelled() {
            Err(AutomationError::stopped_by_user())
        } else {
            Ok(())
        }
    }

    /// Read a run variable.
    #[must_use]
    pub fn get_variable(&self, key: &str) -> Option<serde_json::Value> {
        self.variables.read().get(key).cloned()
    }

    /// Write a run variable.
    pub fn set_variable(&self, key: impl Into<String>, value: serde_json::Value) {
        self.variables.write().insert(key.into(), value);
    }

    /// Record that some action reported a failure result.
    pub fn mark_action_failure(&self) {
        *self.had_action_failures.write() = true;
    }

    /// Whether any action reported a failure result so far.
    #[must_use]
    pub fn had_action_failures(&self) -> bool {
        *self.had_action_failures.read()
    }

    /// Push a template onto the active-expansion stack.
    ///
    /// # Errors
    ///
    /// When `name` is already being expanded, returns the rendered cycle
    /// path (e.g. `"login -> totp -> login"`) for the caller's failure
    /// message. The stack is per-run, so detection state never leaks
    /// between runs.
    pub fn enter_template(&self, name: &str) -> Result<(), String> {
        let mut stack = self.active_templates.lock();
        if stack.iter().any(|active| active == name) {
            let mut path: Vec<&str> = stack.iter().map(String::as_str).collect();
            path.push(name);
            return Err(path.join(" -> "));
        }
        stack.push(name.to_owned());
        Ok(())
    }

    /// Pop a template from the active-expansion stack.
    pub fn exit_template(&self, name: &str) {
        let mut stack = self.active_templates.lock();
        if let Some(position) = stack.iter().rposition(|active| active == name) {
            stack.remove(position);
        }
    }
}
