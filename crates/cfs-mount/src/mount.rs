use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cfs_codec::Codec;
use cfs_store::{FixedContentStore, RecordSnapshot, RecordStore};
use cfs_tree::{DirEntry, Namespace, NodeRef};
use cfs_types::{MountId, NodeAttr, FS_MAGIC};

use crate::builder::{publish, Layout, NamespaceBuilder};
use crate::config::MountConfig;
use crate::error::{MountError, MountResult};
use crate::handle::FileHandle;
use crate::host::{HostBridge, InMemoryHost, NodeHandle};
use crate::ops::{CounterFileOps, FileOperations};

/// One mounted namespace.
///
/// Owns its content store, tree, and host tables. Two mounts never share
/// records. All methods take `&self` and may be called from many threads.
pub struct Mount {
    id: MountId,
    config: MountConfig,
    store: Arc<FixedContentStore>,
    tree: Namespace,
    host: Arc<dyn HostBridge>,
    ops: Arc<dyn FileOperations>,
    layout: Layout,
}

impl Mount {
    /// Mount with an in-process host.
    pub fn new(config: MountConfig) -> MountResult<Self> {
        Self::with_host(config, Arc::new(InMemoryHost::new()))
    }

    /// Mount into the given host.
    pub fn with_host(config: MountConfig, host: Arc<dyn HostBridge>) -> MountResult<Self> {
        config.validate()?;

        let store = Arc::new(FixedContentStore::new(config.capacity));
        let tree = Namespace::with_permissions(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            config.file_perm()?,
            config.dir_perm()?,
        );
        let ops: Arc<dyn FileOperations> =
            Arc::new(CounterFileOps::new(Codec::new(config.mode_policy)));
        let layout = NamespaceBuilder::new(config.layout.clone(), config.creation_seed)
            .build(&tree, host.as_ref(), &ops)?;

        let id = MountId::new();
        info!(
            mount = %id.short_id(),
            capacity = config.capacity,
            policy = %config.mode_policy,
            "mounted counter filesystem"
        );

        Ok(Self {
            id,
            config,
            store,
            tree,
            host,
            ops,
            layout,
        })
    }

    pub fn id(&self) -> &MountId {
        &self.id
    }

    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    pub fn root(&self) -> &NodeRef {
        self.tree.root()
    }

    pub fn tree(&self) -> &Namespace {
        &self.tree
    }

    pub fn store(&self) -> &FixedContentStore {
        &self.store
    }

    /// Nodes created at mount time.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Walk `path` from the root, one component at a time.
    ///
    /// Each step asks the host's dentry cache first and falls back to the
    /// tree on a miss, caching what it finds. `.` stays put and `..` moves
    /// to the parent (the root is its own parent).
    pub fn resolve(&self, path: &str) -> MountResult<NodeRef> {
        Ok(self.resolve_handle(path)?.1)
    }

    fn resolve_handle(&self, path: &str) -> MountResult<(NodeHandle, NodeRef)> {
        let mut walked = vec![(self.layout.root, Arc::clone(self.tree.root()))];

        for name in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
            let (handle, node) = match walked.last() {
                Some((handle, node)) => (*handle, Arc::clone(node)),
                None => break,
            };
            if !node.is_directory() {
                return Err(MountError::NotADirectory { path: node.path() });
            }
            if name == ".." {
                if walked.len() > 1 {
                    walked.pop();
                }
                continue;
            }
            let next = self
                .step(handle, &node, name)?
                .ok_or_else(|| MountError::NotFound {
                    path: path.to_string(),
                })?;
            walked.push(next);
        }

        walked.pop().ok_or_else(|| MountError::NotFound {
            path: path.to_string(),
        })
    }

    fn step(
        &self,
        parent: NodeHandle,
        dir: &NodeRef,
        name: &str,
    ) -> MountResult<Option<(NodeHandle, NodeRef)>> {
        if let Some(child) = self.host.cached_child(parent, name) {
            if let Some(node) = self.host.node(child) {
                return Ok(Some((child, node)));
            }
        }
        let Some(node) = self.tree.lookup(dir, name) else {
            return Ok(None);
        };
        debug!(path = %node.path(), "dentry cache miss");
        let child = publish(self.host.as_ref(), &self.ops, parent, &node)?;
        Ok(Some((child, node)))
    }

    /// Create a file backed by a new record from the store.
    pub fn create_file(&self, path: &str) -> MountResult<NodeRef> {
        let (parent, name) = split_parent(path)?;
        let (handle, dir) = self.resolve_handle(parent)?;
        let node = self.tree.create_file(&dir, name)?;
        publish(self.host.as_ref(), &self.ops, handle, &node)?;
        Ok(node)
    }

    pub fn create_directory(&self, path: &str) -> MountResult<NodeRef> {
        let (parent, name) = split_parent(path)?;
        let (handle, dir) = self.resolve_handle(parent)?;
        let node = self.tree.create_directory(&dir, name)?;
        publish(self.host.as_ref(), &self.ops, handle, &node)?;
        Ok(node)
    }

    /// Open a file at offset 0 using the operations bound to it.
    pub fn open(&self, path: &str) -> MountResult<FileHandle> {
        let (handle, node) = self.resolve_handle(path)?;
        let ops = self
            .host
            .operations(handle)
            .ok_or_else(|| MountError::IsADirectory { path: node.path() })?;
        let record = ops.open(&node)?;
        Ok(FileHandle::new(node, record, ops))
    }

    /// Open `path` and read it to the end, one block at a time.
    pub fn cat(&self, path: &str) -> MountResult<Vec<u8>> {
        self.open(path)?.drain(self.config.block_size as usize)
    }

    /// Open `path` and write `data` as one write.
    pub fn write(&self, path: &str, data: &[u8]) -> MountResult<usize> {
        self.open(path)?.write_bytes(data)
    }

    pub fn stat(&self, path: &str) -> MountResult<NodeStat> {
        let node = self.resolve(path)?;
        Ok(NodeStat {
            path: node.path(),
            attr: node.attr().clone(),
            record: node.record().map(|r| r.snapshot()),
        })
    }

    /// List a directory from the host's dentry cache.
    pub fn readdir(&self, path: &str) -> MountResult<Vec<DirEntry>> {
        let (handle, node) = self.resolve_handle(path)?;
        if !node.is_directory() {
            return Err(MountError::NotADirectory { path: node.path() });
        }
        let entries = self
            .host
            .children(handle)
            .into_iter()
            .filter_map(|(_, child)| self.host.node(child))
            .map(|child| DirEntry::from(child.as_ref()))
            .collect();
        Ok(entries)
    }

    pub fn statfs(&self) -> FsStats {
        FsStats {
            mount_id: self.id.to_string(),
            magic: FS_MAGIC,
            block_size: self.config.block_size,
            capacity: self.store.capacity(),
            allocated: self.store.allocated(),
            free: self.store.remaining(),
            statics: self.store.static_count(),
            nodes: self.tree.node_count(),
        }
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("tree", &self.tree)
            .finish()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        debug!(mount = %self.id.short_id(), "unmounted counter filesystem");
    }
}

/// Result of [`Mount::stat`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStat {
    pub path: String,
    pub attr: NodeAttr,
    /// Present for files only.
    pub record: Option<RecordSnapshot>,
}

/// Result of [`Mount::statfs`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsStats {
    pub mount_id: String,
    pub magic: u32,
    pub block_size: u32,
    pub capacity: usize,
    pub allocated: usize,
    pub free: usize,
    pub statics: usize,
    pub nodes: usize,
}

/// Split `path` into its parent path and final component.
fn split_parent(path: &str) -> MountResult<(&str, &str)> {
    let trimmed = path.trim_end_matches('/');
    let (parent, name) = match trimmed.rfind('/') {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => ("", trimmed),
    };
    if name.is_empty() {
        return Err(MountError::Tree(cfs_tree::TreeError::InvalidName {
            name: path.to_string(),
            reason: "path has no final component".into(),
        }));
    }
    Ok((parent, name))
}
