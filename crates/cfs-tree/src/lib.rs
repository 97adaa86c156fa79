//! Namespace tree for the counter filesystem.
//!
//! The tree is made of [`Node`]s: directories holding named children, and
//! files each bound to one content record owned by a [`RecordStore`].
//!
//! # Architecture
//!
//! - **Directories** own their children by name. The child set only grows:
//!   there is no unlink, rmdir, or rename.
//! - **Files** share their record with the store. Creating a file takes a
//!   fresh slot from the store; the two files laid out at mount time bind
//!   static records instead.
//! - **Lookup** resolves one name inside one directory, and only finds
//!   children created during this session. Walking multi-component paths is
//!   the host's job.
//!
//! # Modules
//!
//! - [`error`] - Error types for tree operations
//! - [`names`] - Node name validation
//! - [`node`] - [`Node`], [`NodeBody`], and [`DirEntry`]
//! - [`namespace`] - The [`Namespace`] that creates and finds nodes
//!
//! [`RecordStore`]: cfs_store::RecordStore

pub mod error;
pub mod names;
pub mod namespace;
pub mod node;

pub use error::{TreeError, TreeResult};
pub use names::validate_name;
pub use namespace::Namespace;
pub use node::{DirEntry, Node, NodeBody, NodeRef};
