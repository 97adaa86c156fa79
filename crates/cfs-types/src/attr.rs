use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::NodeId;

/// Kind of a namespace node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// The `S_IFMT` type bits for this kind.
    pub fn type_bits(&self) -> u32 {
        match self {
            NodeKind::Directory => 0o040000,
            NodeKind::File => 0o100000,
        }
    }
}

/// Unix permission bits (`0o7777` at most).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions(u16);

impl Permissions {
    /// Default bits for regular files.
    pub const FILE: Permissions = Permissions(0o644);
    /// Default bits for directories, root included.
    pub const DIRECTORY: Permissions = Permissions(0o755);

    /// Validate and wrap raw permission bits.
    pub fn new(bits: u32) -> Result<Self, TypeError> {
        if bits > 0o7777 {
            return Err(TypeError::InvalidPermissions(bits));
        }
        Ok(Self(bits as u16))
    }

    pub fn bits(&self) -> u32 {
        self.0 as u32
    }

    /// Default bits for a node of the given kind.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Directory => Self::DIRECTORY,
            NodeKind::File => Self::FILE,
        }
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permissions({:#o})", self.0)
    }
}

/// `ls -l` style rendering, e.g. `rw-r--r--`.
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shift in [6, 3, 0] {
            let triplet = (self.0 >> shift) & 0o7;
            let r = if triplet & 0o4 != 0 { 'r' } else { '-' };
            let w = if triplet & 0o2 != 0 { 'w' } else { '-' };
            let x = if triplet & 0o1 != 0 { 'x' } else { '-' };
            write!(f, "{r}{w}{x}")?;
        }
        Ok(())
    }
}

/// Metadata of a namespace node, fixed at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttr {
    pub ino: NodeId,
    pub kind: NodeKind,
    pub perm: Permissions,
    pub uid: u32,
    pub gid: u32,
    /// Always zero: content size is only known when a read renders it.
    pub size: u64,
    pub blocks: u64,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl NodeAttr {
    /// Attributes for a node created now, owned by root.
    pub fn new(ino: NodeId, kind: NodeKind, perm: Permissions) -> Self {
        let now = SystemTime::now();
        Self {
            ino,
            kind,
            perm,
            uid: 0,
            gid: 0,
            size: 0,
            blocks: 0,
            atime: now,
            mtime: now,
            ctime: now,
        }
    }

    /// Full `st_mode` value: type bits plus permission bits.
    pub fn mode(&self) -> u32 {
        self.kind.type_bits() | self.perm.bits()
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}
