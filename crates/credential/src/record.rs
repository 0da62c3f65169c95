//! Credential records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A string that redacts its contents in `Debug` and `Display`.
///
/// Used for secret field values so a credential can be logged or dumped
/// without leaking. Serialization exposes the value on purpose: the
/// persistence layer needs the real secret, while log output goes through
/// the result processor's redaction instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// A named secret record: a username/password pair plus arbitrary extra
/// fields (API tokens, TOTP seeds, answers to security questions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Unique name the record is stored and referenced under.
    pub name: String,
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: Secret,
    /// Additional named secret fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Secret>,
}

impl Credential {
    /// Create a credential with just a username and password.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            password: Secret::new(password),
            extra: BTreeMap::new(),
        }
    }

    /// Add an extra secret field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(field.into(), Secret::new(value));
        self
    }

    /// Look up a field by name.
    ///
    /// `"username"` and `"password"` resolve to the dedicated fields;
    /// anything else is looked up among the extra fields.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            "username" => Some(&self.username),
            "password" => Some(self.password.expose()),
            other => self.extra.get(other).map(Secret::expose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn secret_redacts_debug_and_display() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(format!("{secret}"), "***");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn credential_debug_does_not_leak_password() {
        let cred = Credential::new("github", "octocat", "hunter2");
        let debug = format!("{cred:?}");
        assert!(debug.contains("octocat"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn field_resolves_builtin_and_extra_fields() {
        let cred = Credential::new("github", "octocat", "hunter2").with_field("totp", "123456");
        assert_eq!(cred.field("username"), Some("octocat"));
        assert_eq!(cred.field("password"), Some("hunter2"));
        assert_eq!(cred.field("totp"), Some("123456"));
        assert_eq!(cred.field("pin"), None);
    }

    #[test]
    fn serde_roundtrip_preserves_secrets() {
        let cred = Credential::new("github", "octocat", "hunter2").with_field("totp", "123456");
        let json = serde_json::to_string(&cred).unwrap();
        // The wire shape carries the real secret for the persistence layer.
        assert!(json.contains("hunter2"));
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(cred, back);
    }

    #[test]
    fn extra_fields_are_omitted_when_empty() {
        let cred = Credential::new("github", "octocat", "hunter2");
        let json = serde_json::to_string(&cred).unwrap();
        assert!(!json.contains("extra"));
    }
}
