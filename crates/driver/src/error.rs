//! Backend fault taxonomy for driver operations.

use std::time::Duration;

use autoqliq_core::AutomationError;

use crate::browser::BrowserType;

/// Faults a driver backend can report.
///
/// Backends map their native exceptions onto this sum at the wrapper
/// layer; everything above the driver seam dispatches on these variants
/// rather than backend-specific types.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum DriverError {
    /// No element matches the selector.
    #[error("no element matches selector '{selector}'")]
    ElementNotFound {
        /// The selector that matched nothing.
        selector: String,
    },

    /// The element exists but cannot be interacted with.
    #[error("element '{selector}' is not interactable")]
    NotInteractable {
        /// The selector of the stale-but-present element.
        selector: String,
    },

    /// A previously located element is no longer attached to the page.
    #[error("stale reference to element '{selector}'")]
    StaleElement {
        /// The selector the reference was located by.
        selector: String,
    },

    /// A wait expired before its condition held.
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout {
        /// What was being waited for.
        what: String,
        /// The wait budget that expired.
        timeout: Duration,
    },

    /// Any other backend fault (session died, protocol error, IO).
    #[error("driver backend error: {message}")]
    Backend {
        /// Rendered backend fault.
        message: String,
    },
}

impl DriverError {
    /// Create a backend fault from any displayable cause.
    pub fn backend(cause: impl std::fmt::Display) -> Self {
        Self::Backend {
            message: cause.to_string(),
        }
    }

    /// Stable tag recorded in failure results, per fault class.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ElementNotFound { .. } | Self::NotInteractable { .. } => "element_error",
            Self::StaleElement { .. } => "stale_element",
            Self::Timeout { .. } => "timeout",
            Self::Backend { .. } => "webdriver_error",
        }
    }

    /// Convert into the shared taxonomy, tagging the responsible backend.
    #[must_use]
    pub fn into_automation(self, driver_type: BrowserType) -> AutomationError {
        AutomationError::webdriver_with_cause(driver_type.as_str(), self.to_string(), &self)
    }
}
