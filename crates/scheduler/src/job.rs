//! Scheduled job records.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use autoqliq_core::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trigger::Trigger;

/// Registry entry for one scheduled binding.
#[derive(Debug)]
pub(crate) struct JobEntry {
    pub workflow_name: String,
    pub credential_name: Option<String>,
    pub trigger: Trigger,
    pub next_run_time: DateTime<Utc>,
    /// Set while a fire of this job is executing; a due fire that finds
    /// it set is skipped.
    pub running: Arc<AtomicBool>,
}

/// Snapshot of one job, as returned by `list_jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Opaque unique id assigned at registration.
    pub id: JobId,
    /// Workflow the job runs.
    pub workflow_name: String,
    /// Credential handed to the run, if any.
    pub credential_name: Option<String>,
    /// Human-readable trigger description.
    pub trigger: String,
    /// When the job fires next.
    pub next_run_time: DateTime<Utc>,
}
