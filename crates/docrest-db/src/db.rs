//! The store adapter: seven path-addressed operations over a [`DocumentStore`].
//!
//! Multi-step operations are strictly sequential and fail fast:
//! - `post`   search, then either get the match or add + re-read
//! - `patch`  search, confirm the match exists, replace it, re-read
//! - `put`    search, then create or replace
//! - `clear`  list, then get + cascading delete for each document
//! - `delete` clear every declared child collection, then delete the document
//!
//! Nothing is rolled back. A failure part-way through `clear` or `delete`
//! leaves whatever was already removed removed.

use docrest_store::{DocumentStore, RawDocument};
use docrest_types::{
    validate_collection_path, validate_document_path, CollectionPath, DocumentPath,
};
use tracing::{debug, info, warn};

use crate::config::{DbConfig, InvalidDeletePath};
use crate::error::{DbError, DbResult};
use crate::resource::{DynResource, Resource};

/// REST-style resource operations over a hierarchical document store.
///
/// `witness` arguments are only used for their type and declared children;
/// `resource` arguments are also written. Paths are raw segment lists and are
/// validated by every operation before the store is touched.
pub trait Db {
    /// All resources directly under `collection`, decoded and post-processed
    /// as one batch. An empty collection yields an empty list.
    fn list<R: Resource, S: AsRef<str>>(&self, witness: &R, collection: &[S]) -> DbResult<Vec<R>>;

    /// Delete every document under `collection`, cascading into each one's
    /// children, one document at a time.
    fn clear<R: Resource, S: AsRef<str>>(&self, witness: &R, collection: &[S]) -> DbResult<()>;

    /// Create `resource` under `collection` unless its search finds an
    /// existing match, in which case the match is returned unchanged.
    fn post<R: Resource, S: AsRef<str>>(&self, resource: &R, collection: &[S]) -> DbResult<R>;

    /// Create or update: `post` when search finds nothing, `patch` otherwise.
    fn put<R: Resource, S: AsRef<str>>(&self, resource: &R, collection: &[S]) -> DbResult<R>;

    /// Replace the document found by `resource`'s search. Fails with
    /// [`DbError::NotFound`] when there is no match.
    fn patch<R: Resource>(&self, resource: &R) -> DbResult<R>;

    /// Fetch and decode one document.
    fn get<R: Resource, S: AsRef<str>>(&self, witness: &R, document: &[S]) -> DbResult<R>;

    /// Delete a document after clearing all of its declared child collections.
    fn delete<R: Resource, S: AsRef<str>>(&self, witness: &R, document: &[S]) -> DbResult<()>;
}

/// [`Db`] implementation over any [`DocumentStore`].
///
/// The store handle is injected at construction and only ever borrowed
/// immutably, so one `DocumentDb` can serve concurrent callers. There is no
/// cross-call atomicity: two concurrent `put`s for the same identity can both
/// miss in search and both create.
#[derive(Debug)]
pub struct DocumentDb<S> {
    store: S,
    config: DbConfig,
}

impl<S: DocumentStore> DocumentDb<S> {
    /// Create an adapter with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, DbConfig::default())
    }

    pub fn with_config(store: S, config: DbConfig) -> Self {
        Self { store, config }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ---- Single-document steps ----

    fn read(&self, document: &DocumentPath, op: &'static str) -> DbResult<RawDocument> {
        match self.store.get_document(document) {
            Ok(Some(raw)) => Ok(raw),
            Ok(None) => Err(DbError::NotFound {
                path: Some(document.to_string()),
                op,
                source: None,
            }),
            Err(source) => Err(DbError::StoreRead {
                path: document.to_string(),
                op,
                source,
            }),
        }
    }

    fn fetch<R: Resource>(&self, witness: &R, document: &DocumentPath) -> DbResult<R> {
        let raw = self.read(document, "Get")?;
        let resource = witness
            .deserialize(&raw)
            .map_err(|source| DbError::Deserialization {
                path: document.to_string(),
                op: "Get",
                source,
            })?;
        debug!(document = %document, "fetched document");
        Ok(resource)
    }

    fn search<R: Resource>(
        &self,
        resource: &R,
        op: &'static str,
    ) -> DbResult<Option<DocumentPath>> {
        let found = resource
            .search(&self.store)
            .map_err(|source| DbError::Search { op, source })?;
        debug!(op, matched = ?found, "searched for existing document");
        Ok(found)
    }

    // ---- Write steps (search already done) ----

    fn create<R: Resource>(&self, resource: &R, collection: &CollectionPath) -> DbResult<R> {
        let fields = Resource::serialize(resource).map_err(|source| DbError::Serialization {
            path: collection.to_string(),
            op: "Post",
            source,
        })?;
        let document = self
            .store
            .add_document(collection, fields)
            .map_err(|source| DbError::StoreWrite {
                path: collection.to_string(),
                op: "Post",
                source,
            })?;
        info!(document = %document, "created document");
        self.fetch(resource, &document)
    }

    fn replace<R: Resource>(&self, resource: &R, existing: &DocumentPath) -> DbResult<R> {
        let (collection, id) = validate_document_path(existing.segments())?;
        let document = collection.document(id);

        match self.store.get_document(&document) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(DbError::NotFound {
                    path: Some(document.to_string()),
                    op: "Patch",
                    source: None,
                })
            }
            Err(source) => {
                return Err(DbError::NotFound {
                    path: Some(document.to_string()),
                    op: "Patch",
                    source: Some(source),
                })
            }
        }

        let fields = Resource::serialize(resource).map_err(|source| DbError::Serialization {
            path: document.to_string(),
            op: "Patch",
            source,
        })?;
        self.store
            .set_document(&document, fields)
            .map_err(|source| DbError::StoreWrite {
                path: document.to_string(),
                op: "Patch",
                source,
            })?;
        info!(document = %document, "replaced document");
        self.fetch(resource, &document)
    }

    // ---- Cascade (type-erased so children may differ in type) ----

    fn clear_dyn(&self, witness: &dyn DynResource, collection: &CollectionPath) -> DbResult<()> {
        let docs = self
            .store
            .list_documents(collection)
            .map_err(|source| DbError::StoreUnavailable {
                path: collection.to_string(),
                op: "Clear",
                source,
            })?;
        debug!(collection = %collection, count = docs.len(), "clearing collection");

        for listed in &docs {
            let document = collection.document(listed.id());
            let raw = self.read(&document, "Clear")?;
            let resource = witness
                .decode_boxed(&raw)
                .map_err(|source| DbError::Deserialization {
                    path: document.to_string(),
                    op: "Clear",
                    source,
                })?;
            self.delete_dyn(resource.as_ref(), &document)?;
        }
        Ok(())
    }

    fn delete_dyn(&self, witness: &dyn DynResource, document: &DocumentPath) -> DbResult<()> {
        for child in witness.declared_children() {
            self.clear_dyn(child.witness(), &document.collection(child.name()))?;
        }
        let existed = self
            .store
            .delete_document(document)
            .map_err(|source| DbError::StoreWrite {
                path: document.to_string(),
                op: "Delete",
                source,
            })?;
        info!(document = %document, existed, "deleted document");
        Ok(())
    }
}

impl<St: DocumentStore> Db for DocumentDb<St> {
    fn list<R: Resource, S: AsRef<str>>(&self, witness: &R, collection: &[S]) -> DbResult<Vec<R>> {
        let collection = validate_collection_path(collection)?;
        let docs = self
            .store
            .list_documents(&collection)
            .map_err(|source| DbError::StoreUnavailable {
                path: collection.to_string(),
                op: "List",
                source,
            })?;
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let decode_err = |source| DbError::Deserialization {
            path: collection.to_string(),
            op: "List",
            source,
        };
        let items = witness.deserialize_list(&docs).map_err(decode_err)?;
        let items = witness.postprocess_list(items).map_err(decode_err)?;
        debug!(collection = %collection, count = items.len(), "listed resources");
        Ok(items)
    }

    fn clear<R: Resource, S: AsRef<str>>(&self, witness: &R, collection: &[S]) -> DbResult<()> {
        let collection = validate_collection_path(collection)?;
        self.clear_dyn(witness, &collection)
    }

    fn post<R: Resource, S: AsRef<str>>(&self, resource: &R, collection: &[S]) -> DbResult<R> {
        if let Some(existing) = self.search(resource, "Post")? {
            debug!(document = %existing, "post matched existing document");
            return self.fetch(resource, &existing);
        }
        let collection = validate_collection_path(collection)?;
        self.create(resource, &collection)
    }

    fn put<R: Resource, S: AsRef<str>>(&self, resource: &R, collection: &[S]) -> DbResult<R> {
        match self.search(resource, "Put")? {
            None => {
                let collection = validate_collection_path(collection)?;
                self.create(resource, &collection)
            }
            Some(existing) => self.replace(resource, &existing),
        }
    }

    fn patch<R: Resource>(&self, resource: &R) -> DbResult<R> {
        let existing = self.search(resource, "Patch")?.ok_or(DbError::NotFound {
            path: None,
            op: "Patch",
            source: None,
        })?;
        self.replace(resource, &existing)
    }

    fn get<R: Resource, S: AsRef<str>>(&self, witness: &R, document: &[S]) -> DbResult<R> {
        let document = DocumentPath::parse(document)?;
        self.fetch(witness, &document)
    }

    fn delete<R: Resource, S: AsRef<str>>(&self, witness: &R, document: &[S]) -> DbResult<()> {
        let document = match DocumentPath::parse(document) {
            Ok(document) => document,
            Err(err) => match self.config.invalid_delete_path {
                InvalidDeletePath::Reject => return Err(err.into()),
                InvalidDeletePath::Ignore => {
                    warn!(error = %err, "ignoring delete with invalid document path");
                    return Ok(());
                }
            },
        };
        self.delete_dyn(witness, &document)
    }
}
