//! Driver lifecycle management.

use std::sync::Arc;

use async_trait::async_trait;
use autoqliq_core::AutomationError;

use crate::driver::WebDriver;
use crate::error::DriverError;
use crate::options::DriverOptions;

/// Opens driver sessions for a backend.
///
/// Concrete backends (a WebDriver client, a DevTools client, the
/// scripted test driver) implement this; the engine only ever sees the
/// factory and the [`WebDriver`] handles it produces.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Open a new session.
    async fn create(&self, options: &DriverOptions) -> Result<Box<dyn WebDriver>, DriverError>;
}

/// Acquires, configures, and releases driver handles.
///
/// Acquisition is scoped to one run. The manager never retries a failed
/// acquire; callers (notably the scheduler) own retry policy. Release is
/// idempotent and never propagates errors, so a release on a failure
/// path cannot mask the genuine cause.
pub struct DriverManager {
    factory: Arc<dyn DriverFactory>,
}

impl DriverManager {
    /// Create a manager around a backend factory.
    pub fn new(factory: Arc<dyn DriverFactory>) -> Self {
        Self { factory }
    }

    /// Open and configure a session.
    ///
    /// Verifies any explicit driver binary exists, creates the session,
    /// and applies the implicit wait. A session that was created but
    /// could not be configured is released before the error returns —
    /// acquire never leaks a handle.
    ///
    /// # Errors
    ///
    /// [`AutomationError::Config`] for a missing driver binary;
    /// [`AutomationError::WebDriver`] for backend faults, tagged with
    /// the browser type.
    pub async fn acquire(
        &self,
        options: &DriverOptions,
    ) -> Result<Box<dyn WebDriver>, AutomationError> {
        if let Some(binary) = &options.driver_binary {
            if !binary.exists() {
                return Err(AutomationError::config(format!(
                    "driver binary not found: {}",
                    binary.display()
                )));
            }
        }

        tracing::info!(
            browser = %options.browser,
            headless = options.headless,
            implicit_wait = ?options.implicit_wait,
            "acquiring driver session"
        );

        let driver = self
            .factory
            .create(options)
            .await
            .map_err(|e| e.into_automation(options.browser))?;

        if let Err(e) = driver.set_implicit_wait(options.implicit_wait).await {
            self.release(driver.as_ref()).await;
            return Err(e.into_automation(options.browser));
        }

        Ok(driver)
    }

    /// Tear a session down.
    ///
    /// Errors are logged at warn and dropped: a release failure must
    /// never overwrite whatever caused the run to end.
    pub async fn release(&self, driver: &dyn WebDriver) {
        if let Err(e) = driver.quit().await {
            tracing::warn!(error = %e, "driver release failed");
        }
    }
}
