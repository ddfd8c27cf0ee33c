//! A schema-less [`Resource`] over raw JSON fields.
//!
//! [`JsonResource`] is what the CLI uses, and it is handy for tooling that
//! has no domain type at hand. Identity is optional: with a natural key
//! configured, `search` finds the document in the key collection whose key
//! field equals this resource's value for it.

use docrest_store::{DocumentStore, Fields, RawDocument};
use docrest_types::{CollectionPath, DocumentPath};
use serde_json::Value;
use tracing::debug;

use crate::error::ResourceError;
use crate::resource::{Resource, Subcollection};

#[derive(Clone, Debug, PartialEq, Eq)]
struct NaturalKey {
    collection: CollectionPath,
    field: String,
}

/// A resource whose content is an arbitrary JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonResource {
    fields: Fields,
    path: Option<DocumentPath>,
    key: Option<NaturalKey>,
    children: Vec<String>,
}

impl JsonResource {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    /// Parse a JSON object. Any other JSON value is rejected.
    pub fn from_json(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            _ => Err(ResourceError::Encode(
                "a JSON resource must be an object".into(),
            )),
        }
    }

    /// Identify resources by `field` within `collection`.
    pub fn with_key(mut self, collection: CollectionPath, field: impl Into<String>) -> Self {
        self.key = Some(NaturalKey {
            collection,
            field: field.into(),
        });
        self
    }

    /// Declare child collections, cascaded in the given order.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Path of the stored document this value was decoded from.
    pub fn path(&self) -> Option<&DocumentPath> {
        self.path.as_ref()
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Resource for JsonResource {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        Ok(Self {
            fields: doc.fields.clone(),
            path: Some(doc.path.clone()),
            key: self.key.clone(),
            children: self.children.clone(),
        })
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        Ok(self.fields.clone())
    }

    fn search(&self, store: &dyn DocumentStore) -> Result<Option<DocumentPath>, ResourceError> {
        let Some(key) = &self.key else {
            return Ok(None);
        };
        let Some(wanted) = self.fields.get(&key.field) else {
            return Ok(None);
        };
        let found = store
            .list_documents(&key.collection)?
            .into_iter()
            .find(|doc| doc.get(&key.field) == Some(wanted))
            .map(|doc| doc.path);
        debug!(
            collection = %key.collection,
            field = %key.field,
            matched = found.is_some(),
            "natural key search"
        );
        Ok(found)
    }

    fn subcollections(&self) -> Vec<Subcollection> {
        self.children
            .iter()
            .map(|name| Subcollection::new(name.clone(), JsonResource::default()))
            .collect()
    }
}
