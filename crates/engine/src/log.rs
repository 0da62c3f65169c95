//! The immutable record of one run.

use autoqliq_action::ActionStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::strategy::ErrorStrategy;

/// Terminal classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalStatus {
    /// Every action succeeded.
    Success,
    /// The run finished, but some actions reported failures.
    CompletedWithErrors,
    /// A terminal error aborted the run.
    Failed,
    /// The run was stopped through its cancellation signal.
    Stopped,
}

impl std::fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::CompletedWithErrors => "COMPLETED_WITH_ERRORS",
            Self::Failed => "FAILED",
            Self::Stopped => "STOPPED",
        };
        f.write_str(label)
    }
}

/// One action outcome as it appears in the log: redacted data, no cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedResult {
    /// Success or failure.
    pub status: ActionStatus,
    /// Human-readable outcome description.
    pub message: String,
    /// Redacted structured details, omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// Structured record of one workflow run.
///
/// Produced once by the result processor and immutable afterwards; the
/// serialized shape is the external wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
    /// Name of the workflow that ran.
    pub workflow_name: String,
    /// Run start, ISO-8601.
    pub start_time_iso: String,
    /// Run end, ISO-8601.
    pub end_time_iso: String,
    /// Wall-clock duration, rounded to two decimals.
    pub duration_seconds: f64,
    /// Terminal classification.
    pub final_status: FinalStatus,
    /// The terminal error, when one aborted the run.
    pub error_message: Option<String>,
    /// One-line outcome summary.
    pub summary: String,
    /// Strategy the run executed under.
    pub error_strategy: ErrorStrategy,
    /// Per-action outcomes, in execution order.
    pub action_results: Vec<FormattedResult>,
    /// Whether any action anywhere in the run — including inside
    /// control-flow bodies whose failures were recovered — reported a
    /// failure result. Run state for callers, not part of the wire
    /// format.
    #[serde(skip)]
    pub had_action_failures: bool,
}

impl ExecutionLog {
    /// One-paragraph human-readable rendering.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Workflow '{}' finished with status {} in {:.2}s: {}",
            self.workflow_name, self.final_status, self.duration_seconds, self.summary
        )
    }

    /// Multi-line report: header plus one ✓/✗ line per step.
    #[must_use]
    pub fn detailed_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "=== Workflow '{}' — {} ===\n",
            self.workflow_name, self.final_status
        ));
        report.push_str(&format!(
            "Started {} · finished {} · {:.2}s · strategy {}\n",
            self.start_time_iso, self.end_time_iso, self.duration_seconds, self.error_strategy
        ));
        if let Some(error) = &self.error_message {
            report.push_str(&format!("Error: {error}\n"));
        }
        for (index, result) in self.action_results.iter().enumerate() {
            let tick = match result.status {
                ActionStatus::Success => '✓',
                ActionStatus::Failure => '✗',
            };
            report.push_str(&format!(
                "{tick} Step {}: {}\n",
                index + 1,
                result.message
            ));
        }
        report
    }
}
