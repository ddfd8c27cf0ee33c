//! Error types for adapter and resource operations.

use docrest_store::StoreError;
use docrest_types::PathError;
use thiserror::Error;

/// Errors raised by a [`Resource`](crate::Resource) implementation.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A stored document could not be turned into the resource.
    #[error("could not decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The resource could not be turned into a field map.
    #[error("could not encode resource: {0}")]
    Encode(String),

    /// The store failed while the resource was searching it.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Any other domain-level failure (e.g. batch postprocessing).
    #[error("{0}")]
    Invalid(String),
}

impl ResourceError {
    /// Create a decode error for the document at `path`.
    pub fn decode(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced by [`Db`](crate::Db) operations.
///
/// Every operation surfaces the first failure it meets. Nothing is retried
/// here; retry policy belongs to the backing store client.
#[derive(Debug, Error)]
pub enum DbError {
    /// A collection or document path had the wrong number of segments.
    #[error("invalid path: {0}")]
    InvalidPathShape(#[from] PathError),

    /// Listing a collection failed.
    #[error("{path}:{op} - could not list documents: {source}")]
    StoreUnavailable {
        path: String,
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// Reading a single document failed.
    #[error("{path}:{op} - could not get document: {source}")]
    StoreRead {
        path: String,
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// Adding, replacing or deleting a document failed.
    #[error("{path}:{op} - could not write document: {source}")]
    StoreWrite {
        path: String,
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// No document exists at `path`, or no document matched the resource
    /// when `path` is `None`.
    #[error("{op} - not found: {}", path.as_deref().unwrap_or("no document matches resource"))]
    NotFound {
        path: Option<String>,
        op: &'static str,
        #[source]
        source: Option<StoreError>,
    },

    /// A stored document (or batch) could not be decoded.
    #[error("{path}:{op} - could not deserialize: {source}")]
    Deserialization {
        path: String,
        op: &'static str,
        #[source]
        source: ResourceError,
    },

    /// The resource could not be encoded for writing.
    #[error("{path}:{op} - could not serialize: {source}")]
    Serialization {
        path: String,
        op: &'static str,
        #[source]
        source: ResourceError,
    },

    /// The resource's own search failed.
    #[error("{op} - search failed: {source}")]
    Search {
        op: &'static str,
        #[source]
        source: ResourceError,
    },
}

impl DbError {
    /// Returns `true` for [`DbError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`DbError::InvalidPathShape`].
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPathShape(_))
    }
}

/// Result alias for adapter operations.
pub type DbResult<T> = Result<T, DbError>;
