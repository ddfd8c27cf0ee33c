use docrest_types::{CollectionPath, DocumentPath};

use crate::document::{Fields, RawDocument};
use crate::error::StoreResult;

/// Hierarchical document store.
///
/// All implementations must satisfy these invariants:
/// - Documents are addressed by their segment list; a segment containing `/`
///   is still a single level.
/// - `list_documents` returns only the direct children of a collection,
///   ordered by document id.
/// - `add_document` assigns the identifier; callers never choose it.
/// - Deleting a document does not delete its subcollections. Data under
///   `doc/sub/...` stays reachable until it is deleted explicitly.
/// - Handles are shared across threads; no method takes `&mut self`.
pub trait DocumentStore: Send + Sync {
    /// List every document directly under `collection`.
    ///
    /// An empty or never-written collection returns an empty list.
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<RawDocument>>;

    /// Read a document. Returns `Ok(None)` if it does not exist.
    fn get_document(&self, document: &DocumentPath) -> StoreResult<Option<RawDocument>>;

    /// Create a document with a store-assigned id and return its path.
    fn add_document(&self, collection: &CollectionPath, fields: Fields)
        -> StoreResult<DocumentPath>;

    /// Replace a document's full contents, creating it if missing.
    fn set_document(&self, document: &DocumentPath, fields: Fields) -> StoreResult<()>;

    /// Delete a document. Returns `true` if it existed.
    fn delete_document(&self, document: &DocumentPath) -> StoreResult<bool>;

    /// Check whether a document exists.
    fn exists(&self, document: &DocumentPath) -> StoreResult<bool> {
        Ok(self.get_document(document)?.is_some())
    }
}
