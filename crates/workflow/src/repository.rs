//! The workflow artifact-store contract and the in-memory reference store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use autoqliq_action::Action;
use autoqliq_core::AutomationError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::definition::Workflow;

/// Bookkeeping a repository maintains about each stored workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Optional free-form description.
    pub description: Option<String>,
    /// When the workflow was first stored.
    pub created_at: DateTime<Utc>,
    /// When the workflow was last saved.
    pub updated_at: DateTime<Utc>,
    /// Number of top-level actions at the last save.
    pub action_count: usize,
}

/// Store of named workflows, safe for concurrent readers.
///
/// The engine loads template expansions through this same contract, so a
/// repository doubles as the template library.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Names of all stored workflows.
    async fn list(&self) -> Result<Vec<String>, AutomationError>;

    /// Load a workflow's actions.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Repository`] when no workflow of that
    /// name exists.
    async fn load(&self, name: &str) -> Result<Vec<Action>, AutomationError>;

    /// Store `actions` under `name`, replacing any existing workflow.
    async fn save(&self, name: &str, actions: Vec<Action>) -> Result<(), AutomationError>;

    /// Create an empty workflow.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Repository`] when the name is taken.
    async fn create(&self, name: &str) -> Result<(), AutomationError>;

    /// Remove a workflow. Returns `false` when it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, AutomationError>;

    /// Fetch the bookkeeping record for a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Repository`] when no workflow of that
    /// name exists.
    async fn get_metadata(&self, name: &str) -> Result<WorkflowMetadata, AutomationError>;
}

fn not_found(name: &str) -> AutomationError {
    AutomationError::repository(format!("workflow not found: {name}"))
}

struct StoredWorkflow {
    workflow: Workflow,
    metadata: WorkflowMetadata,
}

/// In-memory [`WorkflowRepository`] used by tests and the scheduler examples.
#[derive(Default)]
pub struct MemoryWorkflowRepository {
    entries: RwLock<BTreeMap<String, StoredWorkflow>>,
}

impl MemoryWorkflowRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `workflows`.
    #[must_use]
    pub fn with_workflows(workflows: impl IntoIterator<Item = Workflow>) -> Self {
        let now = Utc::now();
        let entries = workflows
            .into_iter()
            .map(|workflow| {
                let metadata = WorkflowMetadata {
                    description: None,
                    created_at: now,
                    updated_at: now,
                    action_count: workflow.actions.len(),
                };
                (workflow.name.clone(), StoredWorkflow { workflow, metadata })
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl WorkflowRepository for MemoryWorkflowRepository {
    async fn list(&self) -> Result<Vec<String>, AutomationError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    async fn load(&self, name: &str) -> Result<Vec<Action>, AutomationError> {
        self.entries
            .read()
            .get(name)
            .map(|stored| stored.workflow.actions.clone())
            .ok_or_else(|| not_found(name))
    }

    async fn save(&self, name: &str, actions: Vec<Action>) -> Result<(), AutomationError> {
        tracing::debug!(workflow = name, actions = actions.len(), "saving workflow");
        let now = Utc::now();
        let mut entries = self.entries.write();
        match entries.get_mut(name) {
            Some(stored) => {
                stored.metadata.updated_at = now;
                stored.metadata.action_count = actions.len();
                stored.workflow.actions = actions;
            }
            None => {
                entries.insert(
                    name.to_owned(),
                    StoredWorkflow {
                        workflow: Workflow::new(name, actions.clone()),
                        metadata: WorkflowMetadata {
                            description: None,
                            created_at: now,
                            updated_at: now,
                            action_count: actions.len(),
                        },
                    },
                );
            }
        }
        Ok(())
    }

    async fn create(&self, name: &str) -> Result<(), AutomationError> {
        let mut entries = self.entries.write();
        if entries.contains_key(name) {
            return Err(AutomationError::repository(format!(
                "workflow already exists: {name}"
            )));
        }
        let now = Utc::now();
        entries.insert(
            name.to_owned(),
            StoredWorkflow {
                workflow: Workflow::empty(name),
                metadata: WorkflowMetadata {
                    description: None,
                    created_at: now,
                    updated_at: now,
                    action_count: 0,
                },
            },
        );
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, AutomationError> {
        Ok(self.entries.write().remove(name).is_some())
    }

    async fn get_metadata(&self, name: &str) -> Result<WorkflowMetadata, AutomationError> {
        self.entries
            .read()
            .get(name)
            .map(|stored| stored.metadata.clone())
            .ok_or_else(|| not_found(name))
    }
}
