//! Raw document snapshots as returned by a [`DocumentStore`](crate::DocumentStore).

use chrono::{DateTime, Utc};
use docrest_types::{CollectionPath, DocumentPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The field map of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// A point-in-time read of one stored document.
///
/// The timestamps are assigned by the store, never by the caller:
/// `create_time` is fixed when the document first appears and `update_time`
/// moves on every write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub path: DocumentPath,
    pub fields: Fields,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl RawDocument {
    /// The document id (last path segment).
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// The collection containing this document.
    pub fn collection(&self) -> CollectionPath {
        self.path.parent()
    }

    /// Look up a single top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
