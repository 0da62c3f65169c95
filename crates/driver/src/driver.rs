//! The capability contract the execution pipeline consumes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;

/// A capability-bound browser handle.
///
/// Selectors are treated opaquely; the in-tree implementations interpret
/// them as CSS, but the contract does not mandate a language. Every
/// operation fails with a [`DriverError`] wrapping the backend's
/// original fault.
///
/// A handle is exclusively owned by one run from acquisition to release;
/// implementations may still use interior mutability so that shared
/// references suffice for the individual operations.
#[async_trait]
pub trait WebDriver: Send + Sync + std::fmt::Debug {
    /// Load a URL.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Assert an element matching `selector` exists.
    async fn find(&self, selector: &str) -> Result<(), DriverError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Type `text` into the first element matching `selector`.
    async fn type_text(&self, selector: &str, text: &str) -> Result<(), DriverError>;

    /// Whether an element matching `selector` currently exists.
    async fn is_element_present(&self, selector: &str) -> Result<bool, DriverError>;

    /// Capture a screenshot of the current page to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), DriverError>;

    /// Wait until an element matching `selector` exists.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Timeout`] when the budget expires first.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Execute a script in the page, returning its JSON-coerced result.
    async fn execute_script(
        &self,
        script: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value, DriverError>;

    /// The current page URL.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// The current page title.
    async fn title(&self) -> Result<String, DriverError>;

    /// Apply an implicit element-lookup wait to the session.
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Tear the session down. Must be idempotent: quitting an already
    /// closed session succeeds.
    async fn quit(&self) -> Result<(), DriverError>;
}
