//! Shared fixtures for adapter tests: a fault-injecting store and a small
//! user/order/item/setting schema with nested child collections.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use docrest_store::{
    DocumentStore, Fields, InMemoryDocumentStore, RawDocument, StoreError, StoreResult,
};
use docrest_types::{CollectionPath, DocumentPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResourceError;
use crate::resource::{decode_fields, encode_fields, Resource, Subcollection};

// ---------------------------------------------------------------------------
// Fault-injecting store
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    List(CollectionPath),
    Get(DocumentPath),
    Add,
    Set,
    Delete(DocumentPath),
}

/// Wraps an in-memory store, failing the operations registered with
/// [`FaultyStore::fail`] and recording the order of successful deletes.
#[derive(Debug, Default)]
pub(crate) struct FaultyStore {
    pub(crate) inner: InMemoryDocumentStore,
    faults: Mutex<Vec<Fault>>,
    deleted: Mutex<Vec<String>>,
    adds: Mutex<usize>,
}

impl FaultyStore {
    pub(crate) fn fail(&self, fault: Fault) {
        self.faults.lock().unwrap().push(fault);
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub(crate) fn add_count(&self) -> usize {
        *self.adds.lock().unwrap()
    }

    pub(crate) fn contains(&self, segments: &[&str]) -> bool {
        self.inner
            .exists(&DocumentPath::parse(segments).unwrap())
            .unwrap()
    }

    pub(crate) fn seed(&self, segments: &[&str], fields: Value) {
        let Value::Object(fields) = fields else {
            panic!("fixture must be an object");
        };
        self.inner
            .set_document(&DocumentPath::parse(segments).unwrap(), fields)
            .unwrap();
    }

    fn check(&self, fault: Fault) -> StoreResult<()> {
        if self.faults.lock().unwrap().contains(&fault) {
            return Err(StoreError::Unavailable(format!("injected fault: {fault:?}")));
        }
        Ok(())
    }
}

impl DocumentStore for FaultyStore {
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<RawDocument>> {
        self.check(Fault::List(collection.clone()))?;
        self.inner.list_documents(collection)
    }

    fn get_document(&self, document: &DocumentPath) -> StoreResult<Option<RawDocument>> {
        self.check(Fault::Get(document.clone()))?;
        self.inner.get_document(document)
    }

    fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentPath> {
        self.check(Fault::Add)?;
        *self.adds.lock().unwrap() += 1;
        self.inner.add_document(collection, fields)
    }

    fn set_document(&self, document: &DocumentPath, fields: Fields) -> StoreResult<()> {
        self.check(Fault::Set)?;
        self.inner.set_document(document, fields)
    }

    fn delete_document(&self, document: &DocumentPath) -> StoreResult<bool> {
        self.check(Fault::Delete(document.clone()))?;
        self.deleted.lock().unwrap().push(document.to_string());
        self.inner.delete_document(document)
    }
}

pub(crate) fn doc_path(segments: &[&str]) -> DocumentPath {
    DocumentPath::parse(segments).unwrap()
}

pub(crate) fn collection_path(segments: &[&str]) -> CollectionPath {
    CollectionPath::new(segments).unwrap()
}

// ---------------------------------------------------------------------------
// Schema: users/{user}/orders/{order}/items/{item}, users/{user}/settings/{s}
// ---------------------------------------------------------------------------

/// Identified by email within the top-level `users` collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct User {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(skip)]
    pub created: Option<DateTime<Utc>>,
}

impl User {
    pub(crate) fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

impl Resource for User {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        let mut user: User = decode_fields(doc)?;
        user.id = Some(doc.id().to_string());
        user.created = Some(doc.create_time);
        Ok(user)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        encode_fields(self)
    }

    fn search(&self, store: &dyn DocumentStore) -> Result<Option<DocumentPath>, ResourceError> {
        let found = store
            .list_documents(&CollectionPath::root("users"))?
            .into_iter()
            .find(|doc| doc.get("email").and_then(Value::as_str) == Some(self.email.as_str()))
            .map(|doc| doc.path);
        Ok(found)
    }

    fn subcollections(&self) -> Vec<Subcollection> {
        vec![
            Subcollection::new("orders", Order::default()),
            Subcollection::new("settings", Setting::default()),
        ]
    }
}

/// Ranked by `placed` after listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Order {
    pub sku: String,
    pub placed: u32,
    #[serde(skip)]
    pub rank: usize,
}

impl Resource for Order {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        decode_fields(doc)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        encode_fields(self)
    }

    fn postprocess_list(&self, mut items: Vec<Self>) -> Result<Vec<Self>, ResourceError> {
        if items.iter().any(|order| order.sku.is_empty()) {
            return Err(ResourceError::Invalid("order without sku".into()));
        }
        items.sort_by_key(|order| order.placed);
        for (i, order) in items.iter_mut().enumerate() {
            order.rank = i + 1;
        }
        Ok(items)
    }

    fn subcollections(&self) -> Vec<Subcollection> {
        vec![Subcollection::new("items", Item::default())]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Item {
    pub qty: u32,
}

impl Resource for Item {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        decode_fields(doc)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        encode_fields(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Setting {
    pub value: String,
}

impl Resource for Setting {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        decode_fields(doc)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        encode_fields(self)
    }
}

/// Declares whatever child collections its stored `children` field names,
/// so a decoded folder can cascade further than its witness.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Folder {
    #[serde(default)]
    pub children: Vec<String>,
}

impl Resource for Folder {
    fn deserialize(&self, doc: &RawDocument) -> Result<Self, ResourceError> {
        decode_fields(doc)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        encode_fields(self)
    }

    fn subcollections(&self) -> Vec<Subcollection> {
        self.children
            .iter()
            .map(|name| Subcollection::new(name.clone(), Folder::default()))
            .collect()
    }
}

/// A resource whose search always fails.
#[derive(Clone, Debug, Default)]
pub(crate) struct Broken;

impl Resource for Broken {
    fn deserialize(&self, _doc: &RawDocument) -> Result<Self, ResourceError> {
        Ok(Broken)
    }

    fn serialize(&self) -> Result<Fields, ResourceError> {
        Ok(Fields::new())
    }

    fn search(&self, _store: &dyn DocumentStore) -> Result<Option<DocumentPath>, ResourceError> {
        Err(ResourceError::Invalid("search index offline".into()))
    }
}
