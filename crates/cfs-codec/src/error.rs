use std::fmt;

use thiserror::Error;

/// Which way a failed copy was going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyDirection {
    /// Rendering into the caller's buffer.
    ToCaller,
    /// Reading the caller's input.
    FromCaller,
}

impl fmt::Display for CopyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyDirection::ToCaller => f.write_str("to caller"),
            CopyDirection::FromCaller => f.write_str("from caller"),
        }
    }
}

/// Errors from the read/write protocol.
///
/// Non-numeric input to a numeric write is not an error: it parses to 0.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The caller-supplied buffer could not be read from or written to.
    #[error("copy fault {direction}: {source}")]
    CopyFault {
        direction: CopyDirection,
        source: std::io::Error,
    },
}

impl CodecError {
    pub(crate) fn to_caller(source: std::io::Error) -> Self {
        Self::CopyFault {
            direction: CopyDirection::ToCaller,
            source,
        }
    }

    pub(crate) fn from_caller(source: std::io::Error) -> Self {
        Self::CopyFault {
            direction: CopyDirection::FromCaller,
            source,
        }
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
