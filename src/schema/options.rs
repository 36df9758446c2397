//! Per-call validation options

use serde::{Deserialize, Serialize};

/// Options for a single validation call.
///
/// Deserializes from a config document such as
/// `{"strict": true, "root_key": "request.body"}`; missing keys take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Reject input keys the schema does not declare
    pub strict: bool,
    /// Prefix prepended to every reported key path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_key: Option<String>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn root_key(mut self, root_key: impl Into<String>) -> Self {
        self.root_key = Some(root_key.into());
        self
    }

    /// Path prefix for the outermost object, empty when unset
    pub(crate) fn prefix(&self) -> &str {
        self.root_key.as_deref().unwrap_or("")
    }
}
