//! Unique identifiers for AutoQliq entities.
//!
//! Strongly-typed UUID identifiers built on [`domain-key`](https://crates.io/crates/domain-key)
//! `Uuid<D>` wrappers. Each identifier is parameterized by a unique domain
//! marker, so an [`ExecutionId`] can never be passed where a [`JobId`] is
//! expected.
//!
//! All id types are `Copy` (16 bytes) and support `v4()`, `nil()`,
//! `parse(&str)`, serde (as a UUID string), `Display`, `FromStr`, `Eq`,
//! `Ord`, and `Hash`.

use domain_key::define_uuid;

// Re-export for downstream parse error handling
pub use domain_key::UuidParseError;

define_uuid!(pub ExecutionIdDomain => ExecutionId);
define_uuid!(pub JobIdDomain => JobId);
