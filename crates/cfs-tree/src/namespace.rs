use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use cfs_store::{RecordRef, RecordStore};
use cfs_types::{NodeAttr, NodeId, NodeKind, Permissions};

use crate::error::{TreeError, TreeResult};
use crate::names::validate_name;
use crate::node::{DirEntry, Node, NodeRef};

/// The directory tree of one mount.
///
/// Creates nodes, hands out inode numbers, and draws file records from the
/// store it was built with. The root exists from construction onward.
pub struct Namespace {
    store: Arc<dyn RecordStore>,
    root: NodeRef,
    next_ino: AtomicU64,
    node_count: AtomicUsize,
    file_perm: Permissions,
    dir_perm: Permissions,
}

impl Namespace {
    /// A namespace holding only a root directory, with default permissions.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_permissions(store, Permissions::FILE, Permissions::DIRECTORY)
    }

    /// A namespace whose new files and directories get the given bits.
    pub fn with_permissions(
        store: Arc<dyn RecordStore>,
        file_perm: Permissions,
        dir_perm: Permissions,
    ) -> Self {
        let root_attr = NodeAttr::new(NodeId::ROOT, NodeKind::Directory, dir_perm);
        let root = Arc::new(Node::directory(root_attr, "", Weak::new()));
        Self {
            store,
            root,
            next_ino: AtomicU64::new(NodeId::ROOT.next().as_u64()),
            node_count: AtomicUsize::new(1),
            file_perm,
            dir_perm,
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Nodes created so far, root included.
    pub fn node_count(&self) -> usize {
        self.node_count.load(Ordering::SeqCst)
    }

    /// Create a file in `parent` backed by a freshly allocated record.
    ///
    /// Fails with [`TreeError::Store`] when the store is full. The name and
    /// parent are checked first, so a rejected create never uses a slot.
    pub fn create_file(&self, parent: &NodeRef, name: &str) -> TreeResult<NodeRef> {
        self.check_insert(parent, name)?;
        let record = self.store.allocate()?;
        self.insert_file(parent, name, record)
    }

    /// Create a file in `parent` bound to an existing record.
    pub fn attach_file(
        &self,
        parent: &NodeRef,
        name: &str,
        record: RecordRef,
    ) -> TreeResult<NodeRef> {
        self.check_insert(parent, name)?;
        self.insert_file(parent, name, record)
    }

    /// Create an empty directory in `parent`.
    pub fn create_directory(&self, parent: &NodeRef, name: &str) -> TreeResult<NodeRef> {
        self.check_insert(parent, name)?;
        let attr = NodeAttr::new(self.next_ino(), NodeKind::Directory, self.dir_perm);
        let node = Arc::new(Node::directory(attr, name, Arc::downgrade(parent)));
        self.insert(parent, node)
    }

    /// Find a child of `parent` created during this session.
    ///
    /// Single component only; never walks paths.
    pub fn lookup(&self, parent: &NodeRef, name: &str) -> Option<NodeRef> {
        parent.child(name)
    }

    /// Sorted listing of a directory.
    pub fn entries(&self, dir: &NodeRef) -> TreeResult<Vec<DirEntry>> {
        if !dir.is_directory() {
            return Err(TreeError::NotADirectory { path: dir.path() });
        }
        Ok(dir.children().iter().map(|n| DirEntry::from(n.as_ref())).collect())
    }

    fn check_insert(&self, parent: &NodeRef, name: &str) -> TreeResult<()> {
        validate_name(name)?;
        if !parent.is_directory() {
            return Err(TreeError::NotADirectory {
                path: parent.path(),
            });
        }
        Ok(())
    }

    fn insert_file(&self, parent: &NodeRef, name: &str, record: RecordRef) -> TreeResult<NodeRef> {
        let attr = NodeAttr::new(self.next_ino(), NodeKind::File, self.file_perm);
        let node = Arc::new(Node::file(attr, name, Arc::downgrade(parent), record));
        self.insert(parent, node)
    }

    fn insert(&self, parent: &NodeRef, node: NodeRef) -> TreeResult<NodeRef> {
        match parent.insert_child(Arc::clone(&node)) {
            Ok(shadowed) => {
                if let Some(old) = shadowed {
                    warn!(path = %node.path(), shadowed_ino = %old.id(), "name shadows an existing entry");
                }
                self.node_count.fetch_add(1, Ordering::SeqCst);
                debug!(path = %node.path(), ino = %node.id(), kind = ?node.kind(), "created node");
                Ok(node)
            }
            Err(_) => Err(TreeError::NotADirectory {
                path: parent.path(),
            }),
        }
    }

    fn next_ino(&self) -> NodeId {
        NodeId::new(self.next_ino.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("nodes", &self.node_count())
            .field("records_allocated", &self.store.allocated())
            .finish()
    }
}
