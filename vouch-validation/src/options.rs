// Validation options

use serde::{Deserialize, Serialize};

/// Key a direct rule is reported under when no parent key is set.
pub const DEFAULT_PARENT_KEY: &str = "noname";

/// Options of a validation run.
///
/// Deserializes from camelCase keys with defaults for anything missing, so
/// options can sit in any serde-backed configuration file.
///
/// ```
/// use vouch_validation::ValidationOptions;
///
/// let options: ValidationOptions =
///     serde_json::from_str(r#"{ "allowExtraProperties": false }"#).unwrap();
///
/// assert!(!options.allow_extra_properties);
/// assert_eq!(options.parent_key(), "noname");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Key a direct rule is reported under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,

    /// Accept input keys that have no rule (default: true)
    pub allow_extra_properties: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            parent_key: None,
            allow_extra_properties: true,
        }
    }
}

impl ValidationOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key a direct rule is reported under
    pub fn with_parent_key(mut self, key: impl Into<String>) -> Self {
        self.parent_key = Some(key.into());
        self
    }

    /// Accept or reject input keys that have no rule
    pub fn allow_extra_properties(mut self, allow: bool) -> Self {
        self.allow_extra_properties = allow;
        self
    }

    /// Reject input keys that have no rule
    pub fn deny_extra_properties(self) -> Self {
        self.allow_extra_properties(false)
    }

    /// Get the parent key, or [`DEFAULT_PARENT_KEY`]
    pub fn parent_key(&self) -> &str {
        self.parent_key.as_deref().unwrap_or(DEFAULT_PARENT_KEY)
    }

    /// Options for a schema nested under `key`.
    ///
    /// Only the parent key carries over; extra properties are allowed again.
    pub(crate) fn nested(key: &str) -> Self {
        Self::new().with_parent_key(key)
    }
}
