//! Driver session configuration.

use std::path::PathBuf;
use std::time::Duration;

use autoqliq_core::AppConfig;
use serde::{Deserialize, Serialize};

use crate::browser::BrowserType;

/// Everything a factory needs to open one driver session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Which browser backend to drive.
    pub browser: BrowserType,
    /// Run without a visible window.
    pub headless: bool,
    /// Implicit element-lookup wait applied right after creation.
    #[serde(with = "duration_secs")]
    pub implicit_wait: Duration,
    /// Explicit driver binary; resolved from configuration or `PATH`
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_binary: Option<PathBuf>,
    /// Backend-specific options, passed through opaquely.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DriverOptions {
    /// Options for a browser with library defaults.
    #[must_use]
    pub fn new(browser: BrowserType) -> Self {
        Self {
            browser,
            headless: false,
            implicit_wait: Duration::from_secs(5),
            driver_binary: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Derive options from application configuration.
    ///
    /// Uses the configured default browser, implicit wait, and any
    /// per-browser driver binary path.
    ///
    /// # Errors
    ///
    /// Returns [`autoqliq_core::AutomationError::Config`] when the
    /// configured default browser tag is unknown.
    pub fn from_config(config: &AppConfig) -> Result<Self, autoqliq_core::AutomationError> {
        let browser: BrowserType = config.default_browser.parse()?;
        Ok(Self {
            browser,
            headless: false,
            implicit_wait: Duration::from_secs(config.implicit_wait),
            driver_binary: config.driver_path_for(browser.as_str()).cloned(),
            extra: serde_json::Map::new(),
        })
    }

    /// Toggle headless mode.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Override the implicit wait.
    #[must_use]
    pub fn with_implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    /// Pin the driver binary path.
    #[must_use]
    pub fn with_driver_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.driver_binary = Some(path.into());
        self
    }
}

/// Serde helper for `Duration` serialized as whole seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
