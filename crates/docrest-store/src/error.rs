use std::path::PathBuf;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot serve requests (poisoned lock, closed backend).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-backed store.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted snapshot could not be decoded.
    #[error("corrupt snapshot {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },
}

impl StoreError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a poisoned-lock error.
    pub(crate) fn poisoned<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(format!("lock poisoned: {err}"))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
