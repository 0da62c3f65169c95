//! The action sum type.

use autoqliq_core::AutomationError;
use serde::{Deserialize, Serialize};

use crate::condition::{Condition, LoopIterator};

/// Maximum nesting depth of control-flow bodies.
pub const MAX_NESTING_DEPTH: usize = 10;

/// Maximum iterations any single loop action may run.
pub const MAX_LOOP_ITERATIONS: u64 = 1000;

/// Where a typing action takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// `value_key` is typed verbatim.
    Literal,
    /// `value_key` is a `"<credential>.<field>"` reference.
    Credential,
}

/// One step of a workflow.
///
/// Serializes to the wire shape consumed by [`ActionFactory`]
/// (`crate::factory::ActionFactory`): an object tagged by `type` whose
/// remaining fields are the variant payload. Actions are immutable once
/// constructed; the engine interprets them, it never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Load a URL.
    Navigate {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Destination URL.
        url: String,
    },

    /// Click the first element matching a selector.
    Click {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Target element.
        selector: String,
        /// When set, this element must be present after the click.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        check_success_selector: Option<String>,
        /// When set, this element being present after the click means failure.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        check_failure_selector: Option<String>,
    },

    /// Type text into the first element matching a selector.
    Type {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Target element.
        selector: String,
        /// Literal value or credential reference.
        value_source: ValueSource,
        /// The literal text, or the `"<credential>.<field>"` key.
        value_key: String,
    },

    /// Pause the workflow.
    Wait {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// How long to pause.
        duration_seconds: u64,
    },

    /// Capture a screenshot of the current page.
    Screenshot {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Destination image path.
        file_path: String,
    },

    /// Branch on a predicate over driver state.
    Conditional {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Predicate deciding the branch.
        condition: Condition,
        /// Steps run when the condition holds.
        #[serde(default)]
        true_branch: Vec<Action>,
        /// Steps run when it does not.
        #[serde(default)]
        false_branch: Vec<Action>,
    },

    /// Repeat a body of steps.
    Loop {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Count or while-condition iteration spec.
        iterator: LoopIterator,
        /// Steps run each iteration.
        body: Vec<Action>,
    },

    /// Run a body, falling back to a recovery body on failure.
    ErrorHandling {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Steps attempted first.
        #[serde(rename = "try")]
        try_branch: Vec<Action>,
        /// Steps run when the try body fails.
        #[serde(rename = "catch")]
        catch_branch: Vec<Action>,
    },

    /// Expand a named sub-workflow in place.
    Template {
        /// Display name for logs and reports.
        #[serde(default)]
        name: String,
        /// Name the sub-workflow is stored under.
        template_name: String,
    },
}

impl Action {
    /// The wire tag of this variant.
    #[must_use]
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "Navigate",
            Self::Click { .. } => "Click",
            Self::Type { .. } => "Type",
            Self::Wait { .. } => "Wait",
            Self::Screenshot { .. } => "Screenshot",
            Self::Conditional { .. } => "Conditional",
            Self::Loop { .. } => "Loop",
            Self::ErrorHandling { .. } => "ErrorHandling",
            Self::Template { .. } => "Template",
        }
    }

    /// The display name, falling back to the wire tag when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        let name = match self {
            Self::Navigate { name, .. }
            | Self::Click { name, .. }
            | Self::Type { name, .. }
            | Self::Wait { name, .. }
            | Self::Screenshot { name, .. }
            | Self::Conditional { name, .. }
            | Self::Loop { name, .. }
            | Self::ErrorHandling { name, .. }
            | Self::Template { name, .. } => name,
        };
        if name.is_empty() {
            self.action_type()
        } else {
            name
        }
    }

    /// `"name (type)"`, as used in log lines and error messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name(), self.action_type())
    }

    /// Whether this variant is interpreted by a control-flow handler
    /// rather than the leaf executor.
    #[must_use]
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Self::Conditional { .. }
                | Self::Loop { .. }
                | Self::ErrorHandling { .. }
                | Self::Template { .. }
        )
    }

    /// Check this action and its nested bodies.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Validation`] for empty required fields,
    /// malformed credential keys, out-of-range loop counts, empty
    /// mandatory bodies, or nesting beyond [`MAX_NESTING_DEPTH`].
    pub fn validate(&self) -> Result<(), AutomationError> {
        self.validate_at_depth(0)
    }

    fn validate_at_depth(&self, depth: usize) -> Result<(), AutomationError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(AutomationError::validation(format!(
                "action '{}' nests deeper than {MAX_NESTING_DEPTH} levels",
                self.name()
            )));
        }

        let require = |ok: bool, what: &str| {
            if ok {
                Ok(())
            } else {
                Err(AutomationError::validation(format!(
                    "{} action requires a non-empty {what}",
                    self.action_type()
                )))
            }
        };

        match self {
            Self::Navigate { url, .. } => require(!url.trim().is_empty(), "url"),
            Self::Click { selector, .. } => require(!selector.trim().is_empty(), "selector"),
            Self::Type {
                selector, value_key, ..
            } => {
                require(!selector.trim().is_empty(), "selector")?;
                // The credential-key grammar is checked at execution time
                // so a malformed key surfaces as a credential fault.
                require(!value_key.is_empty(), "value_key")
            }
            Self::Wait {
                duration_seconds, ..
            } => {
                if *duration_seconds == 0 {
                    return Err(AutomationError::validation(
                        "Wait action requires a duration greater than zero",
                    ));
                }
                Ok(())
            }
            Self::Screenshot { file_path, .. } => {
                require(!file_path.trim().is_empty(), "file_path")
            }
            Self::Conditional {
                condition,
                true_branch,
                false_branch,
                ..
            } => {
                condition.validate()?;
                // Branches may be empty; whatever is present must be valid.
                validate_children(true_branch, depth + 1)?;
                validate_children(false_branch, depth + 1)
            }
            Self::Loop { iterator, body, .. } => {
                iterator.validate(MAX_LOOP_ITERATIONS)?;
                require(!body.is_empty(), "body")?;
                validate_children(body, depth + 1)
            }
            Self::ErrorHandling {
                try_branch,
                catch_branch,
                ..
            } => {
                require(!try_branch.is_empty(), "try body")?;
                require(!catch_branch.is_empty(), "catch body")?;
                validate_children(try_branch, depth + 1)?;
                validate_children(catch_branch, depth + 1)
            }
            Self::Template { template_name, .. } => {
                require(!template_name.trim().is_empty(), "template_name")
            }
        }
    }
}

fn validate_children(children: &[Action], depth: usize) -> Result<(), AutomationError> {
    children
        .iter()
        .try_for_each(|child| child.validate_at_depth(depth))
}
