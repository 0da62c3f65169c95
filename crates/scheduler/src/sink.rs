//! Destinations for the logs of scheduled runs.

use async_trait::async_trait;
use autoqliq_engine::ExecutionLog;
use parking_lot::Mutex;

/// Receives the [`ExecutionLog`] of each scheduled run.
#[async_trait]
pub trait RunSink: Send + Sync {
    /// Record one finished run.
    async fn record(&self, log: ExecutionLog);
}

/// Default sink: logs the run summary and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl RunSink for LogSink {
    async fn record(&self, log: ExecutionLog) {
        tracing::info!(
            workflow = %log.workflow_name,
            status = %log.final_status,
            "{}",
            log.summary_line()
        );
    }
}

/// Collects logs in memory; the test sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    logs: Mutex<Vec<ExecutionLog>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.lock().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.lock().is_empty()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn logs(&self) -> Vec<ExecutionLog> {
        self.logs.lock().clone()
    }
}

#[async_trait]
impl RunSink for MemorySink {
    async fn record(&self, log: ExecutionLog) {
        self.logs.lock().push(log);
    }
}
