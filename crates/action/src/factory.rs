//! Wire-format conversion between serialized mappings and [`Action`]s.

use autoqliq_core::AutomationError;
use serde_json::Value;

use crate::action::Action;

/// Variant tags the factory accepts, matching [`Action::action_type`].
const KNOWN_TYPES: &[&str] = &[
    "Navigate",
    "Click",
    "Type",
    "Wait",
    "Screenshot",
    "Conditional",
    "Loop",
    "ErrorHandling",
    "Template",
];

/// Builds [`Action`]s from their serialized form.
///
/// The factory is the single entry point persistence uses when loading
/// workflows: unknown `type` tags and structurally invalid payloads are
/// rejected with [`AutomationError::Validation`], and every produced
/// action has passed [`Action::validate`].
pub struct ActionFactory;

impl ActionFactory {
    /// Convert one serialized mapping into a validated [`Action`].
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Validation`] when `value` is not an
    /// object, has a missing or unknown `type`, is missing required
    /// payload fields, or fails semantic validation.
    pub fn create_action(value: Value) -> Result<Action, AutomationError> {
        let Some(object) = value.as_object() else {
            return Err(AutomationError::validation(
                "serialized action must be an object",
            ));
        };
        let Some(type_tag) = object
            .get("type")
            .and_then(Value::as_str)
            .map(ToString::to_string)
        else {
            return Err(AutomationError::validation(
                "serialized action is missing its 'type' tag",
            ));
        };
        if !KNOWN_TYPES.contains(&type_tag.as_str()) {
            return Err(AutomationError::validation(format!(
                "unsupported action type: {type_tag}"
            )));
        }

        let action: Action = serde_json::from_value(value).map_err(|e| {
            AutomationError::validation(format!("invalid {type_tag} action: {e}"))
        })?;
        action.validate()?;
        Ok(action)
    }

    /// Convert a serialized list of actions, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid entry, naming its position.
    pub fn create_actions(values: Vec<Value>) -> Result<Vec<Action>, AutomationError> {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Self::create_action(value).map_err(|e| {
                    AutomationError::validation(format!("action {}: {e}", index + 1))
                })
            })
            .collect()
    }
}

impl Action {
    /// Serialize to the wire mapping accepted by [`ActionFactory::create_action`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("action serialization is infallible")
    }
}
