//! Per-action outcome values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which executor failures record their stable error tag.
pub const ERROR_TYPE_KEY: &str = "error_type";

/// Whether an executed step succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// The step did what it was asked to.
    Success,
    /// The step did not complete.
    Failure,
}

/// Outcome of one executed action.
///
/// `data` carries structured details: timings, branch sub-results of
/// control flow, and the executor's `error_type` tag on failures.
/// Sensitive values inside `data` are redacted by the result processor at
/// serialization time, never at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Success or failure.
    pub status: ActionStatus,
    /// Human-readable outcome description.
    pub message: String,
    /// Structured details.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    /// Rendered underlying cause of a failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ActionResult {
    /// Create a success result.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Success,
            message: message.into(),
            data: Map::new(),
            cause: None,
        }
    }

    /// Create a success result with structured details.
    pub fn success_with_data(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            status: ActionStatus::Success,
            message: message.into(),
            data,
            cause: None,
        }
    }

    /// Create a failure result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Failure,
            message: message.into(),
            data: Map::new(),
            cause: None,
        }
    }

    /// Create a failure result with structured details.
    pub fn failure_with_data(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            status: ActionStatus::Failure,
            message: message.into(),
            data,
            cause: None,
        }
    }

    /// Create a failure result carrying an underlying cause.
    pub fn failure_with_cause(
        message: impl Into<String>,
        data: Map<String, Value>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self {
            status: ActionStatus::Failure,
            message: message.into(),
            data,
            cause: Some(cause.to_string()),
        }
    }

    /// Tag the result with a stable `error_type` in its data.
    #[must_use]
    pub fn with_error_type(mut self, error_type: &'static str) -> Self {
        self.data
            .insert(ERROR_TYPE_KEY.to_owned(), Value::String(error_type.into()));
        self
    }

    /// Returns `true` for success results.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    /// The `error_type` tag, when one was recorded.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        self.data.get(ERROR_TYPE_KEY).and_then(Value::as_str)
    }
}
