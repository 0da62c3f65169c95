//! The workflow entity.

use autoqliq_action::{Action, ActionFactory};
use autoqliq_core::AutomationError;
use serde::{Deserialize, Serialize};

/// A named, ordered sequence of actions.
///
/// Owned by the repository between runs; during a run the engine holds a
/// read-only reference to the action list. Serializes to the wire shape
/// `{name, actions: [action]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Name the workflow is stored and referenced under.
    pub name: String,
    /// The steps, in execution order.
    pub actions: Vec<Action>,
}

impl Workflow {
    /// Create a workflow.
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    /// Create an empty workflow.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Check the workflow name and every contained action.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Validation`] for an empty name or any
    /// invalid action, naming the failing step.
    pub fn validate(&self) -> Result<(), AutomationError> {
        if self.name.trim().is_empty() {
            return Err(AutomationError::validation(
                "workflow name must not be empty",
            ));
        }
        for (index, action) in self.actions.iter().enumerate() {
            action.validate().map_err(|e| {
                AutomationError::validation(format!("step {} of '{}': {e}", index + 1, self.name))
            })?;
        }
        Ok(())
    }

    /// Rebuild a workflow from its serialized wire shape.
    ///
    /// Unlike plain deserialization this routes every action through the
    /// [`ActionFactory`], so unknown types and invalid payloads are
    /// rejected with precise messages.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Validation`] for malformed input.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AutomationError> {
        let Some(object) = value.as_object() else {
            return Err(AutomationError::validation(
                "serialized workflow must be an object",
            ));
        };
        let Some(name) = object.get("name").and_then(serde_json::Value::as_str) else {
            return Err(AutomationError::validation(
                "serialized workflow is missing its 'name'",
            ));
        };
        let actions = match object.get("actions") {
            Some(serde_json::Value::Array(entries)) => {
                ActionFactory::create_actions(entries.clone())?
            }
            Some(_) => {
                return Err(AutomationError::validation(
                    "workflow 'actions' must be an array",
                ));
            }
            None => Vec::new(),
        };
        let workflow = Self::new(name, actions);
        workflow.validate()?;
        Ok(workflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nav(url: &str) -> Action {
        Action::Navigate {
            name: String::new(),
            url: url.into(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_workflow() {
        let wf = Workflow::new("login", vec![nav("https://example.com")]);
        assert!(wf.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let wf = Workflow::new("  ", vec![]);
        assert!(wf.validate().is_err());
    }

    #[test]
    fn validate_names_the_failing_step() {
        let wf = Workflow::new("login", vec![nav("https://example.com"), nav("")]);
        let err = wf.validate().unwrap_err();
        assert!(err.to_string().contains("step 2 of 'login'"));
    }

    #[test]
    fn wire_shape_is_name_plus_actions() {
        let wf = Workflow::new("login", vec![nav("https://example.com")]);
        let json = serde_json::to_value(&wf).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "login",
                "actions": [{"type": "Navigate", "name": "", "url": "https://example.com"}],
            })
        );
    }

    #[test]
    fn from_value_roundtrips() {
        let wf = Workflow::new("login", vec![nav("https://example.com")]);
        let back = Workflow::from_value(serde_json::to_value(&wf).unwrap()).unwrap();
        assert_eq!(back, wf);
    }

    #[test]
    fn from_value_rejects_unknown_action_types() {
        let err = Workflow::from_value(serde_json::json!({
            "name": "bad",
            "actions": [{"type": "Hover"}],
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unsupported action type"));
    }

    #[test]
    fn from_value_tolerates_missing_actions() {
        let wf = Workflow::from_value(serde_json::json!({"name": "empty"})).unwrap();
        assert!(wf.actions.is_empty());
    }
}
