//! The [`Resource`] contract implemented by every domain type.
//!
//! A resource knows how to turn store documents into itself and back, which
//! child collections hang off each of its documents, and how to find the
//! canonical existing document for an instance (its notion of identity).
//! The adapter owns paths, dispatch and cascading; resources own everything
//! schema-specific.

use std::fmt;

use docrest_store::{DocumentStore, Fields, RawDocument};
use docrest_types::DocumentPath;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ResourceError;

/// A domain type stored as documents in one or more collections.
///
/// The same value plays two roles. As a *witness* it tells the adapter which
/// type to decode into and which children to cascade through; as a *payload*
/// it is the content written by `post`/`patch`/`put`.
///
/// Only [`deserialize`](Resource::deserialize) and
/// [`serialize`](Resource::serialize) are required. The batch methods apply
/// the single-item methods element by element unless overridden.
pub trait Resource: Sized + Send + Sync + 'static {
    /// Decode one stored document.
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError>;

    /// Encode this resource as a full field map.
    fn serialize(&self) -> Result<Fields, ResourceError>;

    /// Decode a batch of documents. Any failure aborts the whole batch.
    fn deserialize_list(&self, docs: &[RawDocument]) -> Result<Vec<Self>, ResourceError> {
        docs.iter().map(|doc| self.deserialize(doc)).collect()
    }

    /// Encode a batch of resources, one field map per resource.
    fn serialize_list(items: &[Self]) -> Result<Vec<Fields>, ResourceError> {
        items.iter().map(Resource::serialize).collect()
    }

    /// Post-process a decoded batch (ordering, cross-item correlation).
    fn postprocess_list(&self, items: Vec<Self>) -> Result<Vec<Self>, ResourceError> {
        Ok(items)
    }

    /// Find the canonical stored document for this resource, if any.
    ///
    /// Returns at most one path. The default never matches, which makes
    /// `put` behave as a plain create.
    fn search(&self, _store: &dyn DocumentStore) -> Result<Option<DocumentPath>, ResourceError> {
        Ok(None)
    }

    /// Child collections owned by each document of this type, in cascade order.
    fn subcollections(&self) -> Vec<Subcollection> {
        Vec::new()
    }
}

/// Object-safe view of a [`Resource`] used while cascading deletes.
///
/// Children of one parent may be of different types, so the cascade walks
/// them through this trait. It is implemented for every `Resource`.
pub trait DynResource: Send + Sync {
    /// Decode one stored document into a boxed resource of the same type.
    fn decode_boxed(&self, doc: &RawDocument) -> Result<Box<dyn DynResource>, ResourceError>;

    /// Same as [`Resource::subcollections`].
    fn declared_children(&self) -> Vec<Subcollection>;

    /// Rust type name, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<R: Resource> DynResource for R {
    fn decode_boxed(&self, doc: &RawDocument) -> Result<Box<dyn DynResource>, ResourceError> {
        Ok(Box::new(self.deserialize(doc)?))
    }

    fn declared_children(&self) -> Vec<Subcollection> {
        self.subcollections()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<R>()
    }
}

/// A named child collection paired with a representative witness.
///
/// The witness is only used to decode and cascade through the child
/// collection. It is never written.
pub struct Subcollection {
    name: String,
    witness: Box<dyn DynResource>,
}

impl Subcollection {
    pub fn new<R: Resource>(name: impl Into<String>, witness: R) -> Self {
        Self {
            name: name.into(),
            witness: Box::new(witness),
        }
    }

    /// Collection name appended to the parent document path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn witness(&self) -> &dyn DynResource {
        self.witness.as_ref()
    }
}

impl fmt::Debug for Subcollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcollection")
            .field("name", &self.name)
            .field("type", &self.witness.type_name())
            .finish()
    }
}

/// Encode any serde value that serializes to a JSON object as a field map.
pub fn encode_fields<T: Serialize>(value: &T) -> Result<Fields, ResourceError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(ResourceError::Encode(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ResourceError::Encode(e.to_string())),
    }
}

/// Decode a document's fields into any deserializable type.
pub fn decode_fields<T: DeserializeOwned>(doc: &RawDocument) -> Result<T, ResourceError> {
    serde_json::from_value(Value::Object(doc.fields.clone()))
        .map_err(|e| ResourceError::decode(&doc.path, e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
