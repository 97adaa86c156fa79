//! The host side of a mount: node handles, bound operations, and the
//! dentry cache.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use cfs_tree::NodeRef;
use cfs_types::NodeId;

use crate::error::{MountError, MountResult};
use crate::ops::FileOperations;

/// Host-issued reference to a node, analogous to an inode number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<NodeId> for NodeHandle {
    fn from(id: NodeId) -> Self {
        Self(id.as_u64())
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({})", self.0)
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the filesystem needs from the environment it is mounted into.
///
/// The first three methods are the calls the filesystem makes while
/// publishing nodes. The rest are the dispatch queries the host answers
/// when callers open, read, or walk paths.
pub trait HostBridge: Send + Sync {
    /// Give `node` a host-side handle.
    fn make_node(&self, node: &NodeRef) -> MountResult<NodeHandle>;

    /// Route future opens of `handle` to `ops`.
    fn bind_operations(&self, handle: NodeHandle, ops: Arc<dyn FileOperations>) -> MountResult<()>;

    /// Record `child` as `name` inside `parent`. Replaces any earlier entry.
    fn attach_child(&self, parent: NodeHandle, child: NodeHandle, name: &str) -> MountResult<()>;

    /// A cached name under `parent`, if the host has one.
    fn cached_child(&self, parent: NodeHandle, name: &str) -> Option<NodeHandle>;

    fn node(&self, handle: NodeHandle) -> Option<NodeRef>;

    fn operations(&self, handle: NodeHandle) -> Option<Arc<dyn FileOperations>>;

    /// Cached entries under `handle`, sorted by name.
    fn children(&self, handle: NodeHandle) -> Vec<(String, NodeHandle)>;
}

#[derive(Default)]
struct HostTables {
    nodes: HashMap<NodeHandle, NodeRef>,
    operations: HashMap<NodeHandle, Arc<dyn FileOperations>>,
    dentries: HashMap<NodeHandle, BTreeMap<String, NodeHandle>>,
}

/// A host that keeps everything in process memory.
#[derive(Default)]
pub struct InMemoryHost {
    tables: RwLock<HostTables>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes the host has handles for.
    pub fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, HostTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostBridge for InMemoryHost {
    fn make_node(&self, node: &NodeRef) -> MountResult<NodeHandle> {
        let handle = NodeHandle::from(node.id());
        self.write().nodes.insert(handle, Arc::clone(node));
        Ok(handle)
    }

    fn bind_operations(&self, handle: NodeHandle, ops: Arc<dyn FileOperations>) -> MountResult<()> {
        let mut tables = self.write();
        let node = tables
            .nodes
            .get(&handle)
            .ok_or(MountError::UnknownHandle(handle))?;
        if node.is_directory() {
            return Err(MountError::IsADirectory { path: node.path() });
        }
        tables.operations.insert(handle, ops);
        Ok(())
    }

    fn attach_child(&self, parent: NodeHandle, child: NodeHandle, name: &str) -> MountResult<()> {
        let mut tables = self.write();
        for handle in [parent, child] {
            if !tables.nodes.contains_key(&handle) {
                return Err(MountError::UnknownHandle(handle));
            }
        }
        tables
            .dentries
            .entry(parent)
            .or_default()
            .insert(name.to_string(), child);
        debug!(%parent, %child, name, "cached dentry");
        Ok(())
    }

    fn cached_child(&self, parent: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.read().dentries.get(&parent)?.get(name).copied()
    }

    fn node(&self, handle: NodeHandle) -> Option<NodeRef> {
        self.read().nodes.get(&handle).cloned()
    }

    fn operations(&self, handle: NodeHandle) -> Option<Arc<dyn FileOperations>> {
        self.read().operations.get(&handle).cloned()
    }

    fn children(&self, handle: NodeHandle) -> Vec<(String, NodeHandle)> {
        self.read()
            .dentries
            .get(&handle)
            .map(|entries| entries.iter().map(|(n, h)| (n.clone(), *h)).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for InMemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.read();
        f.debug_struct("InMemoryHost")
            .field("nodes", &tables.nodes.len())
            .field("bound", &tables.operations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::CounterFileOps;
    use cfs_store::FixedContentStore;
    use cfs_tree::Namespace;

    fn setup() -> (Namespace, InMemoryHost) {
        (
            Namespace::new(Arc::new(FixedContentStore::new(4))),
            InMemoryHost::new(),
        )
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    #[test]
    fn make_node_uses_inode_number() {
        let (ns, host) = setup();
        let handle = host.make_node(ns.root()).unwrap();
        assert_eq!(handle.as_u64(), NodeId::ROOT.as_u64());
        assert!(Arc::ptr_eq(&host.node(handle).unwrap(), ns.root()));
        assert_eq!(host.node_count(), 1);
    }

    #[test]
    fn bind_operations_on_file() {
        let (ns, host) = setup();
        let file = ns.create_file(ns.root(), "f").unwrap();
        let handle = host.make_node(&file).unwrap();
        assert!(host.operations(handle).is_none());
        host.bind_operations(handle, Arc::new(CounterFileOps::default()))
            .unwrap();
        assert!(host.operations(handle).is_some());
    }

    #[test]
    fn bind_operations_rejects_directory_and_unknown() {
        let (ns, host) = setup();
        let root = host.make_node(ns.root()).unwrap();
        let ops: Arc<dyn FileOperations> = Arc::new(CounterFileOps::default());
        assert!(matches!(
            host.bind_operations(root, Arc::clone(&ops)),
            Err(MountError::IsADirectory { .. })
        ));
        assert!(matches!(
            host.bind_operations(NodeHandle(99), ops),
            Err(MountError::UnknownHandle(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Dentry cache
    // -----------------------------------------------------------------------

    #[test]
    fn attach_and_find_child() {
        let (ns, host) = setup();
        let root = host.make_node(ns.root()).unwrap();
        let file = ns.create_file(ns.root(), "f").unwrap();
        let child = host.make_node(&file).unwrap();

        host.attach_child(root, child, "f").unwrap();
        assert_eq!(host.cached_child(root, "f"), Some(child));
        assert_eq!(host.cached_child(root, "g"), None);
        assert_eq!(host.children(root), vec![("f".to_string(), child)]);
    }

    #[test]
    fn attach_replaces_entry() {
        let (ns, host) = setup();
        let root = host.make_node(ns.root()).unwrap();
        let a = host.make_node(&ns.create_file(ns.root(), "x").unwrap()).unwrap();
        let b = host.make_node(&ns.create_file(ns.root(), "x").unwrap()).unwrap();
        host.attach_child(root, a, "x").unwrap();
        host.attach_child(root, b, "x").unwrap();
        assert_eq!(host.cached_child(root, "x"), Some(b));
        assert_eq!(host.children(root).len(), 1);
    }

    #[test]
    fn attach_unknown_handle_fails() {
        let (ns, host) = setup();
        let root = host.make_node(ns.root()).unwrap();
        assert!(host.attach_child(root, NodeHandle(77), "ghost").is_err());
        assert!(host.children(root).is_empty());
    }

    #[test]
    fn handle_formatting() {
        let h = NodeHandle::from(NodeId::new(5));
        assert_eq!(h.to_string(), "#5");
        assert_eq!(format!("{h:?}"), "NodeHandle(5)");
    }
}
