#![warn(missing_docs)]

//! # AutoQliq Workflow
//!
//! The named-sequence-of-actions entity ([`Workflow`]) and the
//! artifact-store contract the engine and scheduler consume
//! ([`WorkflowRepository`]). Template actions expand through the same
//! repository, so anything that can store a workflow can serve as a
//! template library.

pub mod definition;
pub mod repository;

pub use definition::Workflow;
pub use repository::{MemoryWorkflowRepository, WorkflowMetadata, WorkflowRepository};
