//! Sensitive-data redaction for execution logs.

use serde_json::{Map, Value};

/// Default mask written over sensitive values.
pub const DEFAULT_MASK: &str = "********";

/// Key fragments that mark a value as sensitive.
pub const DEFAULT_SENSITIVE_WORDS: &[&str] =
    &["password", "token", "secret", "key", "credential", "auth"];

/// Masks values under sensitive-looking keys.
///
/// The walk is fully recursive: nested mappings and sequences are
/// traversed to any depth, and a mapping value under a sensitive key is
/// replaced wholesale by the mask. Matching is case-insensitive
/// substring containment over the key name.
#[derive(Debug, Clone)]
pub struct SensitiveDataFilter {
    sensitive_words: Vec<String>,
    mask: String,
}

impl Default for SensitiveDataFilter {
    fn default() -> Self {
        Self {
            sensitive_words: DEFAULT_SENSITIVE_WORDS
                .iter()
                .map(|w| (*w).to_owned())
                .collect(),
            mask: DEFAULT_MASK.to_owned(),
        }
    }
}

impl SensitiveDataFilter {
    /// Create a filter with a custom word list and mask.
    pub fn new(
        sensitive_words: impl IntoIterator<Item = impl Into<String>>,
        mask: impl Into<String>,
    ) -> Self {
        Self {
            sensitive_words: sensitive_words
                .into_iter()
                .map(|w| w.into().to_lowercase())
                .collect(),
            mask: mask.into(),
        }
    }

    /// The mask string values are replaced with.
    #[must_use]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Whether a key counts as sensitive.
    #[must_use]
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        let lowered = key.to_lowercase();
        self.sensitive_words.iter().any(|word| lowered.contains(word))
    }

    /// Redact a mapping, returning a filtered copy.
    #[must_use]
    pub fn filter_map(&self, data: &Map<String, Value>) -> Map<String, Value> {
        data.iter()
            .map(|(key, value)| {
                if self.is_sensitive_key(key) {
                    (key.clone(), Value::String(self.mask.clone()))
                } else {
                    (key.clone(), self.filter_value(value))
                }
            })
            .collect()
    }

    /// Redact any JSON value, recursing through mappings and sequences.
    #[must_use]
    pub fn filter_value(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.filter_map(map)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.filter_value(item)).collect())
            }
            other => other.clone(),
        }
    }
}
