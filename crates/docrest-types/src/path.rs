//! Collection and document path validation.
//!
//! The address space alternates collection and document segments:
//! - A collection path has an odd number of segments (>= 1).
//! - A document path has an even number of segments (>= 2). Its last segment
//!   is the document id and the remaining prefix is the parent collection.
//!
//! Segments are kept as a list and never re-split. Joining with
//! [`PATH_SEPARATOR`] only happens for display, so a segment that itself
//! contains `/` still addresses exactly one level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// Separator used when rendering a path for diagnostics.
pub const PATH_SEPARATOR: char = '/';

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(segment.as_ref());
    }
    out
}

fn to_owned_segments<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    segments.iter().map(|s| s.as_ref().to_string()).collect()
}

/// Validate a collection path, returning the typed path if the shape is valid.
///
/// Fails when the segment count is zero or even.
///
/// # Examples
///
/// ```
/// use docrest_types::validate_collection_path;
///
/// assert!(validate_collection_path(&["users"]).is_ok());
/// assert!(validate_collection_path(&["users", "alice", "orders"]).is_ok());
/// assert!(validate_collection_path::<&str>(&[]).is_err());
/// assert!(validate_collection_path(&["users", "alice"]).is_err());
/// ```
pub fn validate_collection_path<S: AsRef<str>>(
    segments: &[S],
) -> Result<CollectionPath, PathError> {
    if segments.is_empty() || segments.len() % 2 != 1 {
        return Err(PathError::InvalidShape {
            path: join(segments),
            len: segments.len(),
            reason: "collection path levels should be odd",
        });
    }
    Ok(CollectionPath {
        segments: to_owned_segments(segments),
    })
}

/// Validate a document path, returning `(parent_collection, document_id)`.
///
/// Fails when the segment count is <= 1 or odd.
///
/// # Examples
///
/// ```
/// use docrest_types::validate_document_path;
///
/// let (parent, id) = validate_document_path(&["users", "alice"]).unwrap();
/// assert_eq!(parent.to_string(), "users");
/// assert_eq!(id, "alice");
/// assert!(validate_document_path(&["users"]).is_err());
/// ```
pub fn validate_document_path<S: AsRef<str>>(
    segments: &[S],
) -> Result<(CollectionPath, String), PathError> {
    if segments.len() <= 1 {
        return Err(PathError::InvalidShape {
            path: join(segments),
            len: segments.len(),
            reason: "document path levels should be greater than 1",
        });
    }
    if segments.len() % 2 != 0 {
        return Err(PathError::InvalidShape {
            path: join(segments),
            len: segments.len(),
            reason: "document path levels should be even",
        });
    }
    let (parent, id) = segments.split_at(segments.len() - 1);
    Ok((
        CollectionPath {
            segments: to_owned_segments(parent),
        },
        id[0].as_ref().to_string(),
    ))
}

// ---------------------------------------------------------------------------
// CollectionPath
// ---------------------------------------------------------------------------

/// A validated path to a collection (odd number of segments).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Build a collection path from raw segments.
    pub fn new<S: AsRef<str>>(segments: &[S]) -> Result<Self, PathError> {
        validate_collection_path(segments)
    }

    /// A top-level collection.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// The raw segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always odd).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The collection's own name (last segment).
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The document owning this collection, or `None` for a top-level collection.
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 3 {
            return None;
        }
        Some(DocumentPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The path of document `id` inside this collection.
    pub fn document(&self, id: impl Into<String>) -> DocumentPath {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        DocumentPath { segments }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

impl fmt::Debug for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionPath({:?})", self.segments)
    }
}

impl TryFrom<Vec<String>> for CollectionPath {
    type Error = PathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        validate_collection_path(&segments)
    }
}

impl From<CollectionPath> for Vec<String> {
    fn from(path: CollectionPath) -> Self {
        path.segments
    }
}

// ---------------------------------------------------------------------------
// DocumentPath
// ---------------------------------------------------------------------------

/// A validated path to a document (even number of segments, at least two).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Build a document path from raw segments.
    pub fn parse<S: AsRef<str>>(segments: &[S]) -> Result<Self, PathError> {
        let (parent, id) = validate_document_path(segments)?;
        Ok(parent.document(id))
    }

    /// The raw segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always even).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The document id (last segment).
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The collection containing this document.
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    /// The path of subcollection `name` under this document.
    pub fn collection(&self, name: impl Into<String>) -> CollectionPath {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        CollectionPath { segments }
    }

    /// Split into `(parent_collection, document_id)`.
    pub fn split(&self) -> (CollectionPath, &str) {
        (self.parent(), self.id())
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

impl fmt::Debug for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentPath({:?})", self.segments)
    }
}

impl TryFrom<Vec<String>> for DocumentPath {
    type Error = PathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        DocumentPath::parse(&segments)
    }
}

impl From<DocumentPath> for Vec<String> {
    fn from(path: DocumentPath) -> Self {
        path.segments
    }
}
