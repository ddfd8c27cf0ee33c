//! REST-style resource operations over a hierarchical document store.
//!
//! `docrest-db` maps list / create / replace / update / fetch / delete onto a
//! store whose address space alternates collection and document segments.
//! It owns three things:
//!
//! - **Path discipline.** Every operation validates its path shape with the
//!   validators from `docrest-types` before touching the store.
//! - **Create-or-update dispatch.** `post`, `patch` and `put` consult the
//!   resource's own [`Resource::search`] to decide between creating,
//!   returning an existing match, or replacing it.
//! - **Cascading delete.** `delete` clears every declared child collection
//!   (recursively, one document at a time) before removing the document.
//!
//! # Modules
//!
//! - [`resource`]: The [`Resource`] contract and [`Subcollection`]
//! - [`db`]: The [`Db`] trait and its [`DocumentDb`] implementation
//! - [`json`]: [`JsonResource`], a schema-less resource
//! - [`config`]: [`DbConfig`]
//! - [`error`]: [`DbError`] and [`ResourceError`]
//!
//! # Example
//!
//! ```
//! use docrest_db::{Db, DocumentDb, JsonResource};
//! use docrest_store::InMemoryDocumentStore;
//! use serde_json::json;
//!
//! let db = DocumentDb::new(InMemoryDocumentStore::new());
//! let alice = JsonResource::from_json(json!({ "name": "Alice" })).unwrap();
//! let created = db.post(&alice, &["users"]).unwrap();
//!
//! let path = created.path().unwrap().clone();
//! let fetched = db.get(&JsonResource::default(), path.segments()).unwrap();
//! assert_eq!(fetched.fields(), alice.fields());
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod json;
pub mod resource;

#[cfg(test)]
mod testing;

pub use config::{DbConfig, InvalidDeletePath};
pub use db::{Db, DocumentDb};
pub use error::{DbError, DbResult, ResourceError};
pub use json::JsonResource;
pub use resource::{decode_fields, encode_fields, DynResource, Resource, Subcollection};
