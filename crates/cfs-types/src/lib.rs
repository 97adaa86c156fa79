//! Foundation types for the counter filesystem (CFS).
//!
//! This crate provides the identifier, classification, and attribute types
//! shared by every other CFS crate.
//!
//! # Key Types
//!
//! - [`RecordId`] - Slot (or static) index of a content record
//! - [`NodeId`] - Inode-style number of a namespace node
//! - [`MountId`] - UUID v7 identifier of one mount session
//! - [`ContentMode`] - Whether a record currently serves a counter or text
//! - [`ModePolicy`] - What a numeric write does to a text-mode record
//! - [`NodeAttr`] - Kind, permissions, ownership, and timestamps of a node

pub mod attr;
pub mod error;
pub mod id;
pub mod limits;
pub mod mode;

pub use attr::{NodeAttr, NodeKind, Permissions};
pub use error::TypeError;
pub use id::{MountId, NodeId, RecordId};
pub use limits::{BLOCK_SIZE, DEFAULT_CAPACITY, FS_MAGIC, MAX_CAPACITY, NAME_MAX, TEXT_CAPACITY};
pub use mode::{ContentMode, ModePolicy};
