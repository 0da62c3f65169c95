#![warn(missing_docs)]

//! # AutoQliq Core
//!
//! Shared foundations for the AutoQliq automation engine:
//!
//! - [`AutomationError`] — the error taxonomy every layer converts into
//! - Typed identifiers ([`ExecutionId`], [`JobId`])
//! - [`AppConfig`] — the recognized configuration surface
//! - [`logging`] — tracing subscriber bootstrap
//!
//! This crate deliberately knows nothing about actions, drivers, or
//! scheduling; those layers depend on it, never the other way around.

pub mod config;
pub mod error;
pub mod id;
pub mod logging;

pub use config::AppConfig;
pub use error::AutomationError;
pub use id::{ExecutionId, JobId};

/// Result type used throughout AutoQliq.
pub type Result<T> = std::result::Result<T, AutomationError>;
