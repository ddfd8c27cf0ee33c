use thiserror::Error;

/// Errors produced by path validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// The segment count does not match the expected path kind.
    #[error("{path}: {reason} (got {len} segments)")]
    InvalidShape {
        path: String,
        len: usize,
        reason: &'static str,
    },
}
