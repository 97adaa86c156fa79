/// Errors from content store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Every slot of the store has been handed out.
    #[error("content store is full: all {capacity} slots allocated")]
    CapacityExceeded { capacity: usize },

    /// No more static records can be registered.
    #[error("static record limit reached: {limit}")]
    StaticLimit { limit: usize },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
