//! Namespace nodes.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use serde::{Deserialize, Serialize};

use cfs_store::RecordRef;
use cfs_types::{NodeAttr, NodeId, NodeKind};

/// Shared handle to a node.
pub type NodeRef = Arc<Node>;

/// Kind-specific part of a node.
pub enum NodeBody {
    /// Children by name. Grows only.
    Directory(RwLock<HashMap<String, NodeRef>>),
    /// The record backing this file.
    File(RecordRef),
}

/// A directory or file in the namespace.
pub struct Node {
    attr: NodeAttr,
    name: String,
    parent: Weak<Node>,
    body: NodeBody,
}

impl Node {
    pub(crate) fn directory(attr: NodeAttr, name: &str, parent: Weak<Node>) -> Self {
        Self {
            attr,
            name: name.to_string(),
            parent,
            body: NodeBody::Directory(RwLock::new(HashMap::new())),
        }
    }

    pub(crate) fn file(attr: NodeAttr, name: &str, parent: Weak<Node>, record: RecordRef) -> Self {
        Self {
            attr,
            name: name.to_string(),
            parent,
            body: NodeBody::File(record),
        }
    }

    pub fn id(&self) -> NodeId {
        self.attr.ino
    }

    /// Name inside the parent directory; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self) -> &NodeAttr {
        &self.attr
    }

    pub fn kind(&self) -> NodeKind {
        self.attr.kind
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.body, NodeBody::Directory(_))
    }

    /// The owning directory. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    /// The record behind a file node.
    pub fn record(&self) -> Option<&RecordRef> {
        match &self.body {
            NodeBody::File(record) => Some(record),
            NodeBody::Directory(_) => None,
        }
    }

    /// Absolute path, built by walking up to the root. Always starts with
    /// `/`, even once the tree above this node has been dropped.
    pub fn path(&self) -> String {
        let mut ancestors = Vec::new();
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            cursor = node.parent();
            ancestors.push(node);
        }
        let mut parts = vec![self.name.as_str()];
        parts.extend(ancestors.iter().map(|node| node.name.as_str()));
        parts.retain(|name| !name.is_empty());
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    /// A direct child by name. Always `None` for files.
    pub fn child(&self, name: &str) -> Option<NodeRef> {
        match &self.body {
            NodeBody::Directory(children) => children
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(name)
                .cloned(),
            NodeBody::File(_) => None,
        }
    }

    /// Children sorted by name. Empty for files.
    pub fn children(&self) -> Vec<NodeRef> {
        match &self.body {
            NodeBody::Directory(children) => {
                let mut all: Vec<NodeRef> = children
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .values()
                    .cloned()
                    .collect();
                all.sort_by(|a, b| a.name.cmp(&b.name));
                all
            }
            NodeBody::File(_) => Vec::new(),
        }
    }

    /// Insert `child` under its name, returning whatever it displaced.
    ///
    /// Returns `Err(child)` if this node is not a directory.
    pub(crate) fn insert_child(&self, child: NodeRef) -> Result<Option<NodeRef>, NodeRef> {
        match &self.body {
            NodeBody::Directory(children) => Ok(children
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(child.name.clone(), child)),
            NodeBody::File(_) => Err(child),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("ino", &self.attr.ino)
            .field("name", &self.name)
            .field("kind", &self.attr.kind);
        if let Some(record) = self.record() {
            s.field("record", &record.id());
        }
        s.finish()
    }
}

/// One line of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub ino: NodeId,
    pub kind: NodeKind,
}

impl From<&Node> for DirEntry {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            ino: node.id(),
            kind: node.kind(),
        }
    }
}
