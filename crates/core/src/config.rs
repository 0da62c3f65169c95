//! Application configuration surface.
//!
//! The core never reads configuration files itself; callers deserialize an
//! [`AppConfig`] from whatever source they use (TOML, JSON, environment)
//! and hand it to the components that need it. [`AppConfig::validate`]
//! rejects invalid values with [`AutomationError::Config`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// Log levels accepted by [`AppConfig::log_level`].
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Repository backends accepted by [`AppConfig::repository_type`].
const REPOSITORY_TYPES: &[&str] = &["file_system", "database"];

/// Recognized configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser used when a run does not specify one.
    pub default_browser: String,
    /// Implicit element wait applied to new driver sessions, in seconds.
    pub implicit_wait: u64,
    /// Explicit chromedriver binary path; resolved from `PATH` when unset.
    pub chrome_driver_path: Option<PathBuf>,
    /// Explicit geckodriver binary path; resolved from `PATH` when unset.
    pub firefox_driver_path: Option<PathBuf>,
    /// Explicit edgedriver binary path; resolved from `PATH` when unset.
    pub edge_driver_path: Option<PathBuf>,
    /// Minimum severity emitted by the logging subscriber.
    pub log_level: String,
    /// Log destination file; stderr when unset.
    pub log_file: Option<PathBuf>,
    /// Directory the workflow repository stores artifacts under.
    pub workflows_path: PathBuf,
    /// File or directory the credential store persists to.
    pub credentials_path: PathBuf,
    /// Persistence backend selector.
    pub repository_type: String,
    /// Main window title.
    pub window_title: String,
    /// Main window geometry as `<width>x<height>`.
    pub window_geometry: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_browser: "chrome".to_owned(),
            implicit_wait: 5,
            chrome_driver_path: None,
            firefox_driver_path: None,
            edge_driver_path: None,
            log_level: "info".to_owned(),
            log_file: None,
            workflows_path: PathBuf::from("workflows"),
            credentials_path: PathBuf::from("credentials.json"),
            repository_type: "file_system".to_owned(),
            window_title: "AutoQliq".to_owned(),
            window_geometry: "1024x768".to_owned(),
        }
    }
}

impl AppConfig {
    /// Check every option for validity.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Config`] naming the first invalid option.
    pub fn validate(&self) -> Result<(), AutomationError> {
        if self.default_browser.trim().is_empty() {
            return Err(AutomationError::config("default_browser must not be empty"));
        }
        if self.implicit_wait > 300 {
            return Err(AutomationError::config(format!(
                "implicit_wait of {}s exceeds the 300s ceiling",
                self.implicit_wait
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(AutomationError::config(format!(
                "unknown log_level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        if !REPOSITORY_TYPES.contains(&self.repository_type.as_str()) {
            return Err(AutomationError::config(format!(
                "unknown repository_type '{}' (expected one of {})",
                self.repository_type,
                REPOSITORY_TYPES.join(", ")
            )));
        }
        parse_geometry(&self.window_geometry)?;
        Ok(())
    }

    /// Resolve the configured driver binary path for a browser tag.
    ///
    /// Returns `None` when no explicit path is configured, in which case
    /// the driver factory falls back to `PATH` resolution.
    #[must_use]
    pub fn driver_path_for(&self, browser: &str) -> Option<&PathBuf> {
        match browser {
            "chrome" => self.chrome_driver_path.as_ref(),
            "firefox" => self.firefox_driver_path.as_ref(),
            "edge" => self.edge_driver_path.as_ref(),
            _ => None,
        }
    }
}

/// Parse a `<width>x<height>` geometry string.
fn parse_geometry(geometry: &str) -> Result<(u32, u32), AutomationError> {
    let invalid = || {
        AutomationError::config(format!(
            "window_geometry '{geometry}' is not of the form <width>x<height>"
        ))
    };
    let (w, h) = geometry.split_once('x').ok_or_else(invalid)?;
    let width: u32 = w.parse().map_err(|_| invalid())?;
    let height: u32 = h.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
