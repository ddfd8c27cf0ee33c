//! Hierarchical document storage for docrest.
//!
//! This crate defines the backing store that the docrest adapter talks to: a
//! tree of collections and documents where every document is a flat JSON
//! object and may own any number of subcollections. The store is deliberately
//! dumb. It never cascades, never searches, and never interprets fields.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`JsonFileStore`] -- in-memory store persisted as a JSON snapshot file
//!
//! # Design Rules
//!
//! 1. Documents are addressed by segment list, never by a joined string.
//! 2. Identifiers for new documents are assigned by the store (UUID v7).
//! 3. Deleting a document leaves its subcollections untouched.
//! 4. Listing a collection returns direct children only, ordered by id.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod document;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use document::{Fields, RawDocument};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
