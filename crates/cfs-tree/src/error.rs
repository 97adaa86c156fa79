//! Error types for namespace tree operations.

use thiserror::Error;

/// Errors that can occur while building or querying the namespace tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The node name is not acceptable.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A directory operation was attempted on a file.
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// The content store could not supply a record.
    #[error("store error: {0}")]
    Store(#[from] cfs_store::StoreError),
}

/// Convenience type alias for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
