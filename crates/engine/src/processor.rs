//! Canonicalization of run outcomes into an [`ExecutionLog`].

use autoqliq_action::ActionResult;
use autoqliq_core::AutomationError;
use chrono::{DateTime, Utc};

use crate::log::{ExecutionLog, FinalStatus, FormattedResult};
use crate::redact::SensitiveDataFilter;
use crate::strategy::ErrorStrategy;

/// Builds the execution log from collected results.
///
/// Pure given its inputs (apart from reading the clock for the end
/// time): no I/O, no retained state between runs.
#[derive(Debug, Clone, Default)]
pub struct ResultProcessor {
    filter: SensitiveDataFilter,
}

impl ResultProcessor {
    /// Create a processor with the default sensitive-data filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with a custom sensitive-data filter.
    #[must_use]
    pub fn with_filter(filter: SensitiveDataFilter) -> Self {
        Self { filter }
    }

    /// Assemble the log for one finished run.
    ///
    /// `had_action_failures` is the run context's sticky failure flag;
    /// it also covers failures inside control-flow bodies that a catch
    /// branch recovered, which re-counting `results` cannot see.
    #[must_use]
    pub fn create_execution_log(
        &self,
        workflow_name: &str,
        results: &[ActionResult],
        started: DateTime<Utc>,
        error: Option<&AutomationError>,
        strategy: ErrorStrategy,
        had_action_failures: bool,
    ) -> ExecutionLog {
        let ended = Utc::now();
        let duration_seconds = round2((ended - started).num_milliseconds() as f64 / 1000.0);

        let (final_status, error_message, summary) = classify(results, error);

        tracing::info!(
            workflow = workflow_name,
            status = %final_status,
            duration = duration_seconds,
            "workflow finished"
        );
        if let Some(message) = &error_message {
            tracing::error!(workflow = workflow_name, "workflow error: {message}");
        }

        ExecutionLog {
            workflow_name: workflow_name.to_owned(),
            start_time_iso: started.to_rfc3339(),
            end_time_iso: ended.to_rfc3339(),
            duration_seconds,
            final_status,
            error_message,
            summary,
            error_strategy: strategy,
            action_results: results
                .iter()
                .map(|result| self.format_result(result))
                .collect(),
            had_action_failures,
        }
    }

    /// Format one result for the log, redacting its data.
    fn format_result(&self, result: &ActionResult) -> FormattedResult {
        FormattedResult {
            status: result.status,
            message: result.message.clone(),
            data: if result.data.is_empty() {
                None
            } else {
                Some(self.filter.filter_map(&result.data))
            },
        }
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Status, error message, and summary for a finished run.
fn classify(
    results: &[ActionResult],
    error: Option<&AutomationError>,
) -> (FinalStatus, Option<String>, String) {
    if let Some(error) = error {
        if error.is_stop_request() {
            return (
                FinalStatus::Stopped,
                Some("Execution stopped by user request.".to_owned()),
                "Execution stopped by user request".to_owned(),
            );
        }
        return match error {
            AutomationError::Action { action_name, .. } => (
                FinalStatus::Failed,
                Some(error.to_string()),
                format!("Failed during action '{action_name}': {error}"),
            ),
            AutomationError::Workflow { .. } => (
                FinalStatus::Failed,
                Some(error.to_string()),
                format!("Workflow error: {error}"),
            ),
            other => (
                FinalStatus::Failed,
                Some(format!("Unexpected error: {other}")),
                format!("Unexpected error: {other}"),
            ),
        };
    }

    let total = results.len();
    let failures = results.iter().filter(|r| !r.is_success()).count();
    if failures > 0 {
        (
            FinalStatus::CompletedWithErrors,
            Some("Some actions failed".to_owned()),
            format!("Completed with {failures} of {total} actions failing"),
        )
    } else {
        (
            FinalStatus::Success,
            None,
            format!("All {total} actions completed successfully"),
        )
    }
}
