//! Predicates evaluated against live browser state.
//!
//! Conditional actions and `while` loops carry a [`Condition`]; the
//! engine evaluates it against the driver (and the run's variables) each
//! time it is reached.

use autoqliq_core::AutomationError;
use serde::{Deserialize, Serialize};

/// A predicate over driver state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// True when an element matching `selector` exists.
    ElementPresent {
        /// CSS selector to probe.
        selector: String,
    },
    /// True when no element matching `selector` exists.
    ElementAbsent {
        /// CSS selector to probe.
        selector: String,
    },
    /// True when the current URL contains `needle`.
    UrlContains {
        /// Substring looked for in the URL.
        needle: String,
    },
    /// True when the page title contains `needle`.
    TitleContains {
        /// Substring looked for in the title.
        needle: String,
    },
    /// True when the run variable `key` equals `value`.
    VariableEquals {
        /// Variable name in the execution context.
        key: String,
        /// Expected value.
        value: serde_json::Value,
    },
}

impl Condition {
    /// Reject conditions with empty operands.
    pub fn validate(&self) -> Result<(), AutomationError> {
        let empty = |what: &str| {
            Err(AutomationError::validation(format!(
                "condition {what} must not be empty"
            )))
        };
        match self {
            Self::ElementPresent { selector } | Self::ElementAbsent { selector } => {
                if selector.trim().is_empty() {
                    return empty("selector");
                }
            }
            Self::UrlContains { needle } | Self::TitleContains { needle } => {
                if needle.is_empty() {
                    return empty("needle");
                }
            }
            Self::VariableEquals { key, .. } => {
                if key.is_empty() {
                    return empty("variable key");
                }
            }
        }
        Ok(())
    }

    /// Short description for result messages and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ElementPresent { selector } => format!("element '{selector}' present"),
            Self::ElementAbsent { selector } => format!("element '{selector}' absent"),
            Self::UrlContains { needle } => format!("url contains '{needle}'"),
            Self::TitleContains { needle } => format!("title contains '{needle}'"),
            Self::VariableEquals { key, value } => format!("variable '{key}' equals {value}"),
        }
    }
}

/// Iteration spec for loop actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopIterator {
    /// Run the body a fixed number of times.
    Count {
        /// Number of iterations.
        times: u64,
    },
    /// Run the body while the condition holds.
    While {
        /// Predicate re-evaluated before each iteration.
        condition: Condition,
    },
}

impl LoopIterator {
    /// Reject iteration specs that could never run or never stop cheaply.
    pub fn validate(&self, iteration_cap: u64) -> Result<(), AutomationError> {
        match self {
            Self::Count { times } => {
                if *times == 0 {
                    return Err(AutomationError::validation(
                        "loop count must be greater than zero",
                    ));
                }
                if *times > iteration_cap {
                    return Err(AutomationError::validation(format!(
                        "loop count {times} exceeds the iteration cap of {iteration_cap}"
                    )));
                }
                Ok(())
            }
            Self::While { condition } => condition.validate(),
        }
    }

    /// Short description for result messages and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Count { times } => format!("{times} times"),
            Self::While { condition } => format!("while {}", condition.describe()),
        }
    }
}
