#![warn(missing_docs)]

//! # AutoQliq Scheduler
//!
//! Time-trigger dispatch of workflow runs: a registry of trigger →
//! workflow bindings ([`Scheduler`]), the trigger grammar
//! ([`TriggerConfig`] / [`Trigger`]), and the pluggable sink run logs
//! are recorded to ([`RunSink`]).
//!
//! Fires go through a [`WorkflowDispatcher`]; the default
//! [`RunnerDispatcher`] resolves the workflow and credential and runs it
//! through a fresh [`autoqliq_engine::WorkflowRunner`], so a scheduled
//! run has exactly the semantics of a manual one. Missed fires are not
//! replayed, and two fires of one job never run concurrently.

pub mod clock;
pub mod dispatch;
pub mod job;
pub mod scheduler;
pub mod sink;
pub mod trigger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatch::{RunnerDispatcher, WorkflowDispatcher};
pub use job::JobInfo;
pub use scheduler::Scheduler;
pub use sink::{LogSink, MemorySink, RunSink};
pub use trigger::{Trigger, TriggerConfig};
