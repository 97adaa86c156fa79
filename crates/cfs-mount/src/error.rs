//! Error types for mount sessions.

use std::io;

use thiserror::Error;

use cfs_codec::CodecError;
use cfs_store::StoreError;
use cfs_tree::TreeError;
use cfs_types::TypeError;

use crate::host::NodeHandle;

/// Errors that can occur while mounting or operating on a mounted namespace.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("invalid value: {0}")]
    Type(#[from] TypeError),

    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// The host was handed a handle it never issued.
    #[error("unknown node handle: {0}")]
    UnknownHandle(NodeHandle),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience type alias for mount operations.
pub type MountResult<T> = std::result::Result<T, MountError>;

// Lets `FileHandle` implement `io::Read`/`io::Write`. Copy faults keep the
// kind of the failure that caused them.
impl From<MountError> for io::Error {
    fn from(err: MountError) -> Self {
        match err {
            MountError::Io(e) => e,
            MountError::Codec(CodecError::CopyFault { source, .. }) => source,
            MountError::NotFound { .. } => io::Error::new(io::ErrorKind::NotFound, err),
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = MountError::NotFound {
            path: "/missing".into(),
        };
        assert_eq!(err.to_string(), "no such file or directory: /missing");

        let err = MountError::from(StoreError::CapacityExceeded { capacity: 50 });
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn io_conversion_keeps_kind() {
        let err: io::Error = MountError::NotFound { path: "/x".into() }.into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = MountError::IsADirectory { path: "/".into() }.into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
