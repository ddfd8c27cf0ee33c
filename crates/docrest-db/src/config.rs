use serde::{Deserialize, Serialize};

/// What `delete` does when handed a malformed document path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDeletePath {
    /// Fail with [`DbError::InvalidPathShape`](crate::DbError::InvalidPathShape),
    /// like every other operation.
    #[default]
    Reject,
    /// Return success without touching the store. Only for callers that
    /// depend on the historical behaviour.
    Ignore,
}

/// Configuration for a [`DocumentDb`](crate::DocumentDb).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Handling of malformed paths passed to `delete`.
    pub invalid_delete_path: InvalidDeletePath,
}

impl DbConfig {
    /// Configuration matching the historical adapter: `delete` silently
    /// ignores malformed paths.
    pub fn compatible() -> Self {
        Self {
            invalid_delete_path: InvalidDeletePath::Ignore,
        }
    }
}
