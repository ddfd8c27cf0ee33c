//! File-backed document store.
//!
//! [`JsonFileStore`] keeps the whole tree in an [`InMemoryDocumentStore`] and
//! rewrites a single JSON snapshot after every mutation. Writes go to a temp
//! file in the same directory and are renamed into place, so a crash leaves
//! either the old or the new snapshot on disk, never a torn one. A mutation
//! whose snapshot cannot be written is rolled back in memory as well.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use docrest_types::{CollectionPath, DocumentPath};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::{Fields, RawDocument};
use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryDocumentStore;
use crate::traits::DocumentStore;

/// Current on-disk snapshot format.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    documents: Vec<RawDocument>,
}

/// A [`DocumentStore`] persisted to one JSON file.
///
/// Every successful add, set or delete rewrites and fsyncs the whole
/// snapshot, so a cascading clear of N documents costs N full rewrites.
/// Suited to CLI-sized trees, not to bulk workloads.
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryDocumentStore,
    // Held across mutate-then-persist so snapshots land in mutation order.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot =
                    serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptSnapshot {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::CorruptSnapshot {
                        path,
                        reason: format!(
                            "unsupported snapshot version {}, expected {SNAPSHOT_VERSION}",
                            snapshot.version
                        ),
                    });
                }
                info!(
                    path = %path.display(),
                    count = snapshot.documents.len(),
                    "loaded snapshot"
                );
                InMemoryDocumentStore::from_documents(snapshot.documents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot; starting empty");
                InMemoryDocumentStore::new()
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        Ok(Self {
            path,
            inner,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of documents at any depth.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn persist(&self) -> StoreResult<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            documents: self.inner.snapshot()?,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            count = snapshot.documents.len(),
            "snapshot written"
        );
        Ok(())
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&InMemoryDocumentStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().map_err(StoreError::poisoned)?;
        let checkpoint = self.inner.checkpoint()?;
        let out = op(&self.inner)?;
        if let Err(err) = self.persist() {
            warn!(
                path = %self.path.display(),
                error = %err,
                "snapshot write failed; rolling back"
            );
            self.inner.restore(checkpoint)?;
            return Err(err);
        }
        Ok(out)
    }
}

impl DocumentStore for JsonFileStore {
    fn list_documents(&self, collection: &CollectionPath) -> StoreResult<Vec<RawDocument>> {
        self.inner.list_documents(collection)
    }

    fn get_document(&self, document: &DocumentPath) -> StoreResult<Option<RawDocument>> {
        self.inner.get_document(document)
    }

    fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentPath> {
        self.mutate(|inner| inner.add_document(collection, fields))
    }

    fn set_document(&self, document: &DocumentPath, fields: Fields) -> StoreResult<()> {
        self.mutate(|inner| inner.set_document(document, fields))
    }

    fn delete_document(&self, document: &DocumentPath) -> StoreResult<bool> {
        self.mutate(|inner| inner.delete_document(document))
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("document_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!(name));
        fields
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        let users = CollectionPath::root("users");

        let added = {
            let store = JsonFileStore::open(&file).unwrap();
            let added = store.add_document(&users, fields("alice")).unwrap();
            let bob = users.document("bob");
            store.set_document(&bob, fields("bob")).unwrap();
            store.delete_document(&bob).unwrap();
            added
        };

        let reopened = JsonFileStore::open(&file).unwrap();
        assert_eq!(reopened.len(), 1);
        let doc = reopened.get_document(&added).unwrap().expect("persisted");
        assert_eq!(doc.fields, fields("alice"));
    }

    /// Occupy the snapshot path with a non-empty directory so the final
    /// rename of every write fails.
    fn block_snapshot(file: &Path) {
        if file.exists() {
            std::fs::remove_file(file).unwrap();
        }
        std::fs::create_dir(file).unwrap();
        std::fs::write(file.join("occupied"), b"x").unwrap();
    }

    #[test]
    fn failed_add_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        let store = JsonFileStore::open(&file).unwrap();
        let users = CollectionPath::root("users");
        block_snapshot(&file);

        let result = store.add_document(&users, fields("alice"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.len(), 0);
        assert!(store.list_documents(&users).unwrap().is_empty());
    }

    #[test]
    fn failed_delete_and_set_are_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        let store = JsonFileStore::open(&file).unwrap();
        let alice = CollectionPath::root("users").document("alice");
        store.set_document(&alice, fields("alice")).unwrap();
        block_snapshot(&file);

        assert!(store.delete_document(&alice).is_err());
        assert!(store.exists(&alice).unwrap());

        assert!(store.set_document(&alice, fields("changed")).is_err());
        let doc = store.get_document(&alice).unwrap().expect("still stored");
        assert_eq!(doc.fields, fields("alice"));
    }

    #[test]
    fn write_after_failure_persists_only_committed_state() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        let store = JsonFileStore::open(&file).unwrap();
        let users = CollectionPath::root("users");
        block_snapshot(&file);
        assert!(store.add_document(&users, fields("lost")).is_err());

        std::fs::remove_dir_all(&file).unwrap();
        store.set_document(&users.document("bob"), fields("bob")).unwrap();

        let reopened = JsonFileStore::open(&file).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.exists(&users.document("bob")).unwrap());
    }

    #[test]
    fn creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::open(&file).unwrap();
        store
            .set_document(&CollectionPath::root("users").document("alice"), fields("a"))
            .unwrap();
        assert!(file.exists());
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        std::fs::write(&file, b"not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&file),
            Err(StoreError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        std::fs::write(&file, br#"{"version": 99, "documents": []}"#).unwrap();
        let err = JsonFileStore::open(&file).unwrap_err();
        assert!(err.to_string().contains("unsupported snapshot version 99"));
    }

    #[test]
    fn invalid_stored_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.json");
        std::fs::write(
            &file,
            br#"{"version": 1, "documents": [{
                "path": ["users"],
                "fields": {},
                "create_time": "2024-01-01T00:00:00Z",
                "update_time": "2024-01-01T00:00:00Z"
            }]}"#,
        )
        .unwrap();
        assert!(matches!(
            JsonFileStore::open(&file),
            Err(StoreError::CorruptSnapshot { .. })
        ));
    }
}
