//! Content-record storage for the counter filesystem.
//!
//! Every regular file in a CFS namespace is backed by one [`ContentRecord`]:
//! an atomic counter plus an optional short text. Records are owned by a
//! content store and shared with the file nodes that reference them.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`FixedContentStore`] -- a preallocated slot array with a bump cursor
//!
//! # Design Rules
//!
//! 1. Records are never freed and slots are never reused.
//! 2. The allocation cursor only moves forward, one slot per allocation.
//! 3. Allocation past the capacity fails with [`StoreError::CapacityExceeded`].
//! 4. Counter updates are atomic; text updates happen under a per-record lock.
//! 5. Static records (bound to the pre-created files) do not use slots.

pub mod error;
pub mod fixed;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fixed::FixedContentStore;
pub use record::{ContentRecord, Payload, RecordRef, RecordSnapshot, TextBuf};
pub use traits::RecordStore;
