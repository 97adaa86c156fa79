//! Mount sessions for the counter filesystem.
//!
//! A [`Mount`] ties the pieces together: it owns a content store, a
//! namespace tree over that store, and a [`HostBridge`] that hands out node
//! handles and dispatches opens to [`FileOperations`].
//!
//! # Mount sequence
//!
//! 1. Validate the [`MountConfig`].
//! 2. Create the store and the root directory.
//! 3. Lay out the initial files and directory with [`NamespaceBuilder`],
//!    publishing each node to the host.
//! 4. Reset the store's creation seed.
//!
//! # Example
//!
//! ```
//! use cfs_mount::{Mount, MountConfig};
//!
//! let mount = Mount::new(MountConfig::default()).unwrap();
//! assert_eq!(mount.cat("/contador1").unwrap(), b"1\n");
//! assert_eq!(mount.cat("/contador1").unwrap(), b"2\n");
//!
//! mount.write("/contador1", b"abc").unwrap();
//! assert_eq!(mount.cat("/contador1").unwrap(), b"3\nabc\n\n");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod handle;
pub mod host;
pub mod mount;
pub mod ops;

pub use builder::{Layout, NamespaceBuilder};
pub use config::{LayoutConfig, MountConfig};
pub use error::{MountError, MountResult};
pub use handle::FileHandle;
pub use host::{HostBridge, InMemoryHost, NodeHandle};
pub use mount::{FsStats, Mount, NodeStat};
pub use ops::{CounterFileOps, FileOperations};
