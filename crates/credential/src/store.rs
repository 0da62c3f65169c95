//! The credential store contract and the in-memory reference store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use autoqliq_core::AutomationError;
use parking_lot::RwLock;

use crate::key::CredentialKey;
use crate::record::Credential;

/// Store of named secret records, safe for concurrent readers.
///
/// The engine treats implementations as thread-safe by contract; writers
/// coordinate externally.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Names of all stored credentials.
    async fn list(&self) -> Result<Vec<String>, AutomationError>;

    /// Fetch a credential by name; `None` when absent.
    async fn get(&self, name: &str) -> Result<Option<Credential>, AutomationError>;

    /// Insert or replace a credential under its own name.
    async fn save(&self, credential: Credential) -> Result<(), AutomationError>;

    /// Remove a credential. Returns `false` when it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, AutomationError>;
}

/// Resolve a `"<credential>.<field>"` key to its secret value.
///
/// # Errors
///
/// Returns [`AutomationError::Credential`] naming the credential when the
/// record or the field is missing; store faults pass through unchanged.
pub async fn resolve_field(
    store: &dyn CredentialStore,
    key: &CredentialKey,
) -> Result<String, AutomationError> {
    let credential = store.get(&key.credential).await?.ok_or_else(|| {
        AutomationError::credential_named(
            &key.credential,
            format!("credential not found: {}", key.credential),
        )
    })?;

    credential
        .field(&key.field)
        .map(str::to_owned)
        .ok_or_else(|| {
            AutomationError::credential_named(
                &key.credential,
                format!(
                    "field '{}' not found in credential '{}'",
                    key.field, key.credential
                ),
            )
        })
}

/// In-memory [`CredentialStore`] used by tests and the scheduler examples.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<BTreeMap<String, Credential>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let records = credentials
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list(&self) -> Result<Vec<String>, AutomationError> {
        Ok(self.records.read().keys().cloned().collect())
    }

    async fn get(&self, name: &str) -> Result<Option<Credential>, AutomationError> {
        Ok(self.records.read().get(name).cloned())
    }

    async fn save(&self, credential: Credential) -> Result<(), AutomationError> {
        tracing::debug!(credential = %credential.name, "saving credential");
        self.records
            .write()
            .insert(credential.name.clone(), credential);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, AutomationError> {
        Ok(self.records.write().remove(name).is_some())
    }
}
