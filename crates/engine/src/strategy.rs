//! Error-handling strategy for a run.

use serde::{Deserialize, Serialize};

/// Whether a failing action aborts the workflow or merely marks it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorStrategy {
    /// The first failure raises and aborts the run.
    #[default]
    StopOnError,
    /// Failures are recorded and execution proceeds to the next step.
    ContinueOnError,
}

impl ErrorStrategy {
    /// The canonical constant name, as written into execution logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StopOnError => "STOP_ON_ERROR",
            Self::ContinueOnError => "CONTINUE_ON_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
