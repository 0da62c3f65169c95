//! Tracing subscriber bootstrap.
//!
//! Libraries in this workspace only ever emit through the `tracing`
//! macros; installing a subscriber is the embedding application's call.
//! [`init`] wires one up from an [`AppConfig`] for callers that do not
//! bring their own.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AutomationError;

/// Install a global fmt subscriber configured from `config`.
///
/// Honors `log_level` as the default directive (still overridable through
/// `RUST_LOG`) and `log_file` as the destination; stderr is used when no
/// file is configured.
///
/// # Errors
///
/// Returns [`AutomationError::Config`] when the level directive does not
/// parse, the log file cannot be opened, or a global subscriber is
/// already installed.
pub fn init(config: &AppConfig) -> Result<(), AutomationError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.log_level)?,
    };

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AutomationError::config(format!(
                        "cannot open log_file '{}': {e}",
                        path.display()
                    ))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    }
    .map_err(|e| AutomationError::config(format!("logging already initialized: {e}")))
}

/// Parse a level directive into an [`EnvFilter`].
fn parse_filter(level: &str) -> Result<EnvFilter, AutomationError> {
    EnvFilter::try_new(level)
        .map_err(|e| AutomationError::config(format!("invalid log_level '{level}': {e}")))
}
