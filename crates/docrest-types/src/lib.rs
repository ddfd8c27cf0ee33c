//! Foundation types for docrest.
//!
//! A docrest address space alternates collection and document segments:
//! `collection/doc/collection/doc/...`. This crate owns the shape rules for
//! that address space and nothing else. Every other docrest crate depends on
//! `docrest-types`.
//!
//! # Key Types
//!
//! - [`CollectionPath`]: odd number of segments, ending in a collection name
//! - [`DocumentPath`]: even number of segments, ending in a document id
//! - [`PathError`]: shape violations reported by the validators
//!
//! Both path types can only be built through [`validate_collection_path`] and
//! [`validate_document_path`] (or the constructors that call them), so a value
//! of either type always satisfies its shape invariant.

pub mod error;
pub mod path;

pub use error::PathError;
pub use path::{
    validate_collection_path, validate_document_path, CollectionPath, DocumentPath,
    PATH_SEPARATOR,
};
