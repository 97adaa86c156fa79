use std::sync::Arc;

use tracing::debug;

use cfs_tree::{Namespace, NodeRef};

use crate::config::LayoutConfig;
use crate::error::MountResult;
use crate::host::{HostBridge, NodeHandle};
use crate::ops::FileOperations;

/// Nodes created at mount time.
#[derive(Clone, Debug)]
pub struct Layout {
    pub root: NodeHandle,
    pub root_file: NodeRef,
    pub directory: NodeRef,
    pub directory_file: NodeRef,
}

/// Lays out the initial namespace and publishes it to the host.
///
/// The two pre-created files bind static records, so every store slot is
/// left for files created after mount.
#[derive(Clone, Debug)]
pub struct NamespaceBuilder {
    layout: LayoutConfig,
    creation_seed: i64,
}

impl NamespaceBuilder {
    pub fn new(layout: LayoutConfig, creation_seed: i64) -> Self {
        Self {
            layout,
            creation_seed,
        }
    }

    pub fn build(
        &self,
        tree: &Namespace,
        host: &dyn HostBridge,
        ops: &Arc<dyn FileOperations>,
    ) -> MountResult<Layout> {
        let store = tree.store();
        let root = host.make_node(tree.root())?;

        let record_a = store.register_static()?;
        let root_file = tree.attach_file(tree.root(), &self.layout.root_file, record_a)?;
        publish(host, ops, root, &root_file)?;

        let directory = tree.create_directory(tree.root(), &self.layout.directory)?;
        let dir_handle = publish(host, ops, root, &directory)?;

        let record_b = store.register_static()?;
        let directory_file = tree.attach_file(&directory, &self.layout.directory_file, record_b)?;
        publish(host, ops, dir_handle, &directory_file)?;

        store.reset_creation_seed(self.creation_seed);
        debug!(seed = self.creation_seed, "initial layout ready");

        Ok(Layout {
            root,
            root_file,
            directory,
            directory_file,
        })
    }
}

/// Give `node` a host handle, bind file operations if it is a file, and
/// cache it under `parent`.
pub(crate) fn publish(
    host: &dyn HostBridge,
    ops: &Arc<dyn FileOperations>,
    parent: NodeHandle,
    node: &NodeRef,
) -> MountResult<NodeHandle> {
    let handle = host.make_node(node)?;
    if !node.is_directory() {
        host.bind_operations(handle, Arc::clone(ops))?;
    }
    host.attach_child(parent, handle, node.name())?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use crate::ops::CounterFileOps;
    use cfs_store::{FixedContentStore, RecordStore};
    use cfs_types::ContentMode;

    fn build(capacity: usize, seed: i64) -> (Namespace, InMemoryHost, Layout) {
        let tree = Namespace::new(Arc::new(FixedContentStore::new(capacity)));
        let host = InMemoryHost::new();
        let ops: Arc<dyn FileOperations> = Arc::new(CounterFileOps::default());
        let layout = NamespaceBuilder::new(LayoutConfig::default(), seed)
            .build(&tree, &host, &ops)
            .unwrap();
        (tree, host, layout)
    }

    #[test]
    fn default_layout() {
        let (tree, host, layout) = build(4, 0);
        assert_eq!(layout.root_file.path(), "/contador1");
        assert_eq!(layout.directory.path(), "/carpeta1");
        assert_eq!(layout.directory_file.path(), "/carpeta1/contador2");
        assert_eq!(tree.node_count(), 4);
        assert_eq!(host.node_count(), 4);
    }

    #[test]
    fn static_files_start_fresh_and_use_no_slots() {
        let (tree, _, layout) = build(4, 0);
        for file in [&layout.root_file, &layout.directory_file] {
            let record = file.record().unwrap();
            assert!(record.id().is_static());
            assert_eq!(record.counter(), 0);
            assert_eq!(record.mode(), ContentMode::Counter);
        }
        assert_eq!(tree.store().allocated(), 0);
        assert_eq!(tree.store().remaining(), 4);
    }

    #[test]
    fn static_records_are_distinct() {
        let (_, _, layout) = build(1, 0);
        let a = layout.root_file.record().unwrap();
        let b = layout.directory_file.record().unwrap();
        assert_ne!(a.id(), b.id());
        a.increment();
        assert_eq!(b.counter(), 0);
    }

    #[test]
    fn host_cache_mirrors_layout() {
        let (_, host, layout) = build(1, 0);
        let file = host.cached_child(layout.root, "contador1").unwrap();
        assert!(host.operations(file).is_some());

        let dir = host.cached_child(layout.root, "carpeta1").unwrap();
        assert!(host.operations(dir).is_none());
        assert!(host.cached_child(dir, "contador2").is_some());
    }

    #[test]
    fn seed_applies_to_later_files() {
        let (tree, _, layout) = build(2, 100);
        assert_eq!(layout.root_file.record().unwrap().counter(), 0);
        let later = tree.create_file(tree.root(), "later").unwrap();
        assert_eq!(later.record().unwrap().counter(), 100);
    }

    #[test]
    fn custom_names() {
        let tree = Namespace::new(Arc::new(FixedContentStore::new(1)));
        let host = InMemoryHost::new();
        let ops: Arc<dyn FileOperations> = Arc::new(CounterFileOps::default());
        let names = LayoutConfig {
            root_file: "a".into(),
            directory: "d".into(),
            directory_file: "b".into(),
        };
        let layout = NamespaceBuilder::new(names, 0)
            .build(&tree, &host, &ops)
            .unwrap();
        assert_eq!(layout.directory_file.path(), "/d/b");
    }
}
