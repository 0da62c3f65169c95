#![warn(missing_docs)]

//! # AutoQliq Engine
//!
//! The workflow execution pipeline:
//!
//! - [`ActionExecutor`] validates and executes one leaf action against
//!   the driver, converting every backend fault into a failure result
//! - [`ExecutionManager`] walks an action sequence, dispatching leaves
//!   to the executor and control flow to its handlers, honouring
//!   cancellation and the configured [`ErrorStrategy`]
//! - [`ResultProcessor`] turns collected results into an immutable
//!   [`ExecutionLog`] with timing, redaction, and status classification
//! - [`WorkflowRunner`] composes driver lifetime, the manager, and the
//!   processor into the single `run()` entry point
//!
//! Callers get exactly one [`ExecutionLog`] per run, never an exception.

pub mod context;
pub mod control_flow;
pub mod executor;
pub mod log;
pub mod manager;
pub mod processor;
pub mod redact;
pub mod runner;
pub mod strategy;

pub use context::ExecutionContext;
pub use executor::ActionExecutor;
pub use log::{ExecutionLog, FinalStatus, FormattedResult};
pub use manager::ExecutionManager;
pub use processor::ResultProcessor;
pub use redact::SensitiveDataFilter;
pub use runner::WorkflowRunner;
pub use strategy::ErrorStrategy;
