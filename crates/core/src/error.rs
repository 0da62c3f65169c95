//! The AutoQliq error taxonomy.
//!
//! Every fault in the system is converted into an [`AutomationError`] at a
//! well-defined boundary: driver backend faults at the lifecycle manager,
//! action and credential faults at the executor, persistence faults at the
//! repository adapters. Layers above those boundaries only ever see this
//! taxonomy.

/// Message used when a run is stopped through its cancellation signal.
///
/// The result processor classifies a run as `STOPPED` by matching this
/// phrase, so it must stay in sync with [`AutomationError::is_stop_request`].
pub const STOP_REQUEST_MESSAGE: &str = "Workflow execution stopped by request.";

/// Error kinds shared across the AutoQliq crates.
///
/// Each variant carries a human-readable message plus kind-specific
/// context. Underlying causes are carried as rendered strings so the
/// error stays `Clone` and serializes cleanly into execution logs.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum AutomationError {
    /// An action was rejected before execution.
    #[error("validation error: {message}")]
    Validation {
        /// What was invalid.
        message: String,
    },

    /// Execution of a leaf action failed.
    #[error("action '{action_name}' failed: {message}")]
    Action {
        /// Name of the failing action.
        action_name: String,
        /// What went wrong.
        message: String,
        /// Rendered underlying cause, if any.
        cause: Option<String>,
    },

    /// Orchestration-level failure, including user-requested stops.
    #[error("workflow error: {message}")]
    Workflow {
        /// What went wrong.
        message: String,
        /// Workflow the failure occurred in, when known.
        workflow_name: Option<String>,
    },

    /// A browser driver backend fault.
    #[error("webdriver error ({driver_type}): {message}")]
    WebDriver {
        /// Driver backend tag (e.g. `"chrome"`).
        driver_type: String,
        /// What went wrong.
        message: String,
        /// Rendered underlying cause, if any.
        cause: Option<String>,
    },

    /// Credential lookup or resolution failed.
    #[error("credential error: {message}")]
    Credential {
        /// What went wrong.
        message: String,
        /// Credential the failure relates to, when known.
        credential_name: Option<String>,
    },

    /// Configuration is invalid.
    #[error("configuration error: {message}")]
    Config {
        /// What was invalid.
        message: String,
    },

    /// A persistence collaborator fault.
    #[error("repository error: {message}")]
    Repository {
        /// What went wrong.
        message: String,
        /// Rendered underlying cause, if any.
        cause: Option<String>,
    },
}

impl AutomationError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an action error.
    pub fn action(action_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Action {
            action_name: action_name.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Create an action error carrying an underlying cause.
    pub fn action_with_cause(
        action_name: impl Into<String>,
        message: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::Action {
            action_name: action_name.into(),
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Create a workflow error.
    pub fn workflow(message: impl Into<String>) -> Self {
        Self::Workflow {
            message: message.into(),
            workflow_name: None,
        }
    }

    /// Create a workflow error naming the workflow it occurred in.
    pub fn workflow_in(workflow_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workflow {
            message: message.into(),
            workflow_name: Some(workflow_name.into()),
        }
    }

    /// The workflow error raised when a cancellation signal is observed.
    #[must_use]
    pub fn stopped_by_user() -> Self {
        Self::Workflow {
            message: STOP_REQUEST_MESSAGE.to_owned(),
            workflow_name: None,
        }
    }

    /// Create a webdriver error.
    pub fn webdriver(driver_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WebDriver {
            driver_type: driver_type.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Create a webdriver error carrying an underlying cause.
    pub fn webdriver_with_cause(
        driver_type: impl Into<String>,
        message: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::WebDriver {
            driver_type: driver_type.into(),
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Create a credential error.
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
            credential_name: None,
        }
    }

    /// Create a credential error naming the credential it relates to.
    pub fn credential_named(
        credential_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Credential {
            message: message.into(),
            credential_name: Some(credential_name.into()),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a repository error.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a repository error carrying an underlying cause.
    pub fn repository_with_cause(
        message: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::Repository {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Returns `true` if this error represents a user-requested stop.
    #[must_use]
    pub fn is_stop_request(&self) -> bool {
        matches!(self, Self::Workflow { message, .. } if message.to_lowercase().contains("stopped by request"))
    }

    /// Stable lowercase tag for the error kind, used in structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Action { .. } => "action",
            Self::Workflow { .. } => "workflow",
            Self::WebDriver { .. } => "webdriver",
            Self::Credential { .. } => "credential",
            Self::Config { .. } => "config",
            Self::Repository { .. } => "repository",
        }
    }
}
