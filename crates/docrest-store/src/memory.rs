use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use docrest_types::{CollectionPath, DocumentPath};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Fields, RawDocument};
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

#[derive(Clone, Debug)]
struct StoredDocument {
    fields: Fields,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
}

/// In-memory, BTreeMap-based document store.
///
/// Intended for tests and embedding. Documents are keyed by their full path
/// behind a `RwLock`, so sibling documents sort together and by id. Documents
/// are cloned on read/write.
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<DocumentPath, StoredDocument>>,
}

/// Full copy of a store's contents, taken with [`InMemoryDocumentStore::checkpoint`].
pub(crate) struct Checkpoint(BTreeMap<DocumentPath, StoredDocument>);

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Build a store pre-populated with `documents`, keeping their timestamps.
    pub fn from_documents(documents: impl IntoIterator<Item = RawDocument>) -> Self {
        let map = documents
            .into_iter()
            .map(|doc| {
                (
                    doc.path,
                    StoredDocument {
                        fields: doc.fields,
                        create_time: doc.create_time,
                        update_time: doc.update_time,
                    },
                )
            })
            .collect();
        Self {
            documents: RwLock::new(map),
        }
    }

    /// Number of documents at any depth.
    ///
    /// A poisoned lock still reports the documents it guards.
    pub fn len(&self) -> usize {
        match self.documents.read() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored document path, in order.
    pub fn paths(&self) -> StoreResult<Vec<DocumentPath>> {
        let map = self.documents.read().map_err(StoreError::poisoned)?;
        Ok(map.keys().cloned().collect())
    }

    /// Every stored document, in path order.
    pub fn snapshot(&self) -> StoreResult<Vec<RawDocument>> {
        let map = self.documents.read().map_err(StoreError::poisoned)?;
        Ok(map
            .iter()
            .map(|(path, stored)| to_raw(path, stored))
            .collect())
    }

    pub(crate) fn checkpoint(&self) -> StoreResult<Checkpoint> {
        let map = self.documents.read().map_err(StoreError::poisoned)?;
        Ok(Checkpoint(map.clone()))
    }

    /// Replace the contents with a previously taken checkpoint.
    pub(crate) fn restore(&self, checkpoint: Checkpoint) -> StoreResult<()> {
        let mut map = self.documents.write().map_err(StoreError::poisoned)?;
        *map = checkpoint.0;
        Ok(())
    }
}

fn to_raw(path: &DocumentPath, stored: &StoredDocument) -> RawDocument {
    RawDocument {
        path: path.clone(),
        fields: stored.fields.clone(),
        create_time: stored.create_time,
        update_time: stored.update_time,
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<RawDocument>> {
        let map = self.documents.read().map_err(StoreError::poisoned)?;
        let prefix = collection.segments();
        // Descendants of `collection` sort contiguously, starting at the empty id.
        let docs: Vec<RawDocument> = map
            .range(collection.document("")..)
            .take_while(|(path, _)| path.segments().starts_with(prefix))
            .filter(|(path, _)| path.depth() == prefix.len() + 1)
            .map(|(path, stored)| to_raw(path, stored))
            .collect();
        debug!(collection = %collection, count = docs.len(), "listed documents");
        Ok(docs)
    }

    fn get_document(&self, document: &DocumentPath) -> StoreResult<Option<RawDocument>> {
        let map = self.documents.read().map_err(StoreError::poisoned)?;
        Ok(map.get(document).map(|stored| to_raw(document, stored)))
    }

    fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentPath> {
        let mut map = self.documents.write().map_err(StoreError::poisoned)?;
        let mut path = collection.document(Uuid::now_v7().simple().to_string());
        while map.contains_key(&path) {
            path = collection.document(Uuid::now_v7().simple().to_string());
        }
        let now = Utc::now();
        map.insert(
            path.clone(),
            StoredDocument {
                fields,
                create_time: now,
                update_time: now,
            },
        );
        debug!(document = %path, "added document");
        Ok(path)
    }

    fn set_document(&self, document: &DocumentPath, fields: Fields) -> StoreResult<()> {
        let mut map = self.documents.write().map_err(StoreError::poisoned)?;
        let now = Utc::now();
        let create_time = map
            .get(document)
            .map(|existing| existing.create_time)
            .unwrap_or(now);
        map.insert(
            document.clone(),
            StoredDocument {
                fields,
                create_time,
                update_time: now,
            },
        );
        debug!(document = %document, "set document");
        Ok(())
    }

    fn delete_document(&self, document: &DocumentPath) -> StoreResult<bool> {
        let mut map = self.documents.write().map_err(StoreError::poisoned)?;
        Ok(map.remove(document).is_some())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}
