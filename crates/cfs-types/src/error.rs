use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown mode policy: {0}")]
    UnknownModePolicy(String),

    #[error("permission bits out of range: {0:#o}")]
    InvalidPermissions(u32),
}
