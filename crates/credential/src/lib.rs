#![warn(missing_docs)]

//! # AutoQliq Credential
//!
//! Credential records, the `"<credential>.<field>"` key grammar used by
//! typing actions, and the store contract the engine consumes. The engine
//! never reads secrets from anywhere else; whatever backend implements
//! [`CredentialStore`] is injected at composition time.

pub mod key;
pub mod record;
pub mod store;

pub use key::CredentialKey;
pub use record::{Credential, Secret};
pub use store::{CredentialStore, MemoryCredentialStore, resolve_field};
