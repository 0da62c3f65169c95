//! The `"<credential>.<field>"` key grammar.

use std::fmt;
use std::str::FromStr;

use autoqliq_core::AutomationError;
use serde::{Deserialize, Serialize};

/// Parsed reference to one field of one stored credential.
///
/// Typing actions reference secrets as `"<credential>.<field>"`, e.g.
/// `"github.password"`. Exactly one dot separates the two non-empty
/// parts; field names themselves cannot contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialKey {
    /// Name of the stored credential record.
    pub credential: String,
    /// Field inside the record.
    pub field: String,
}

impl CredentialKey {
    /// Parse a `"<credential>.<field>"` string.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Credential`] when the key is not two
    /// non-empty dot-separated parts.
    pub fn parse(raw: &str) -> Result<Self, AutomationError> {
        let malformed = || {
            AutomationError::credential(format!(
                "invalid credential key '{raw}': expected '<credential_name>.<field>'"
            ))
        };
        let (credential, field) = raw.split_once('.').ok_or_else(malformed)?;
        if credential.is_empty() || field.is_empty() || field.contains('.') {
            return Err(malformed());
        }
        Ok(Self {
            credential: credential.to_owned(),
            field: field.to_owned(),
        })
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.credential, self.field)
    }
}

impl FromStr for CredentialKey {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CredentialKey {
    type Error = AutomationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CredentialKey> for String {
    fn from(key: CredentialKey) -> Self {
        key.to_string()
    }
}
