//! A fully scripted in-memory driver.
//!
//! Serves the engine and scheduler test suites: elements are declared
//! present or absent per selector, faults are injected per selector, and
//! every call is recorded for later assertion. No browser is involved.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::driver::WebDriver;
use crate::error::DriverError;

#[derive(Debug, Default)]
struct ScriptedState {
    present: BTreeSet<String>,
    faults: BTreeMap<String, DriverError>,
    url: String,
    title: String,
    typed: BTreeMap<String, String>,
    calls: Vec<String>,
    screenshots: Vec<PathBuf>,
    script_result: serde_json::Value,
    navigation_fault: Option<String>,
    implicit_wait_fault: Option<String>,
    quit_fault: Option<String>,
    quit_calls: u32,
}

/// Scripted [`WebDriver`] implementation.
///
/// The driver itself is handed to the engine (which consumes it); keep a
/// [`ScriptedDriverHandle`] from [`ScriptedDriver::handle`] to steer the
/// script and inspect recorded calls afterwards.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    state: Arc<Mutex<ScriptedState>>,
}

/// Shared steering/inspection handle for a [`ScriptedDriver`].
#[derive(Clone)]
pub struct ScriptedDriverHandle {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedDriver {
    /// Create a driver with nothing present and nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver where the given selectors already match elements.
    #[must_use]
    pub fn with_elements<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let driver = Self::new();
        {
            let mut state = driver.state.lock();
            state.present = selectors.into_iter().map(Into::into).collect();
        }
        driver
    }

    /// A steering handle sharing this driver's state.
    #[must_use]
    pub fn handle(&self) -> ScriptedDriverHandle {
        ScriptedDriverHandle {
            state: self.state.clone(),
        }
    }
}

impl ScriptedDriverHandle {
    /// Make `selector` match an element from now on.
    pub fn add_element(&self, selector: impl Into<String>) {
        self.state.lock().present.insert(selector.into());
    }

    /// Make `selector` match nothing from now on.
    pub fn remove_element(&self, selector: &str) {
        self.state.lock().present.remove(selector);
    }

    /// Fail interactions with `selector` with the given fault.
    pub fn fail_selector(&self, selector: impl Into<String>, fault: DriverError) {
        self.state.lock().faults.insert(selector.into(), fault);
    }

    /// Fail the next and all further navigations.
    pub fn fail_navigation(&self, message: impl Into<String>) {
        self.state.lock().navigation_fault = Some(message.into());
    }

    /// Fail applying the implicit wait.
    pub fn fail_implicit_wait(&self, message: impl Into<String>) {
        self.state.lock().implicit_wait_fault = Some(message.into());
    }

    /// Fail the next quit; later quits succeed.
    pub fn fail_quit(&self, message: impl Into<String>) {
        self.state.lock().quit_fault = Some(message.into());
    }

    /// Set the page title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().title = title.into();
    }

    /// Set the value `execute_script` returns.
    pub fn set_script_result(&self, value: serde_json::Value) {
        self.state.lock().script_result = value;
    }

    /// Every call made so far, in order, as rendered strings.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Text typed into `selector`, if any.
    #[must_use]
    pub fn typed_into(&self, selector: &str) -> Option<String> {
        self.state.lock().typed.get(selector).cloned()
    }

    /// Screenshot paths captured so far.
    #[must_use]
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().screenshots.clone()
    }

    /// The current page URL.
    #[must_use]
    pub fn current_url(&self) -> String {
        self.state.lock().url.clone()
    }

    /// How many times quit was called.
    #[must_use]
    pub fn quit_count(&self) -> u32 {
        self.state.lock().quit_calls
    }
}

impl ScriptedState {
    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn fault_for(&self, selector: &str) -> Option<DriverError> {
        self.faults.get(selector).cloned()
    }

    fn require_present(&self, selector: &str) -> Result<(), DriverError> {
        if let Some(fault) = self.fault_for(selector) {
            return Err(fault);
        }
        if self.present.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound {
                selector: selector.to_owned(),
            })
        }
    }
}

#[async_trait]
impl WebDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("navigate {url}"));
        if let Some(message) = state.navigation_fault.clone() {
            return Err(DriverError::Backend { message });
        }
        state.url = url.to_owned();
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("find {selector}"));
        state.require_present(selector)
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("click {selector}"));
        state.require_present(selector)
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        // The text itself stays out of the call log; tests read it back
        // through `typed_into`.
        state.record(format!("type {selector}"));
        state.require_present(selector)?;
        state.typed.insert(selector.to_owned(), text.to_owned());
        Ok(())
    }

    async fn is_element_present(&self, selector: &str) -> Result<bool, DriverError> {
        let mut state = self.state.lock();
        state.record(format!("is_present {selector}"));
        Ok(state.present.contains(selector))
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("screenshot {}", path.display()));
        std::fs::write(path, b"\x89PNG scripted").map_err(DriverError::backend)?;
        state.screenshots.push(path.to_owned());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("wait_for {selector}"));
        if let Some(fault) = state.fault_for(selector) {
            return Err(fault);
        }
        if state.present.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                what: format!("'{selector}'"),
                timeout,
            })
        }
    }

    async fn execute_script(
        &self,
        script: &str,
        _args: &[serde_json::Value],
    ) -> Result<serde_json::Value, DriverError> {
        let mut state = self.state.lock();
        state.record(format!("execute_script {script}"));
        Ok(state.script_result.clone())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().url.clone())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().title.clone())
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.record(format!("set_implicit_wait {}s", timeout.as_secs()));
        if let Some(message) = state.implicit_wait_fault.clone() {
            return Err(DriverError::Backend { message });
        }
        Ok(())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.quit_calls += 1;
        state.record("quit".to_owned());
        if let Some(message) = state.quit_fault.take() {
            return Err(DriverError::Backend { message });
        }
        Ok(())
    }
}
