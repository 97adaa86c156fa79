use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a content record inside a content store.
///
/// Dynamic records live in numbered slots of the fixed-capacity array.
/// Static records are registered by the namespace builder at mount time
/// and never count against the slot capacity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordId {
    /// A record registered at mount time, outside the slot array.
    Static(u16),
    /// A record allocated from the slot array.
    Slot(u32),
}

impl RecordId {
    /// Returns `true` if this record was registered at mount time.
    pub fn is_static(&self) -> bool {
        matches!(self, RecordId::Static(_))
    }

    /// The slot index, if this is a dynamic record.
    pub fn slot(&self) -> Option<usize> {
        match self {
            RecordId::Slot(i) => Some(*i as usize),
            RecordId::Static(_) => None,
        }
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({self})")
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Static(i) => write!(f, "static:{i}"),
            RecordId::Slot(i) => write!(f, "slot:{i}"),
        }
    }
}

/// Inode-style number of a namespace node. The root is always `NodeId::ROOT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Number assigned to the root directory of every mount.
    pub const ROOT: NodeId = NodeId(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The number following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of one mount session (UUID v7 for time-ordering).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountId(uuid::Uuid);

impl MountId {
    /// Generate a new time-ordered mount ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MountId({})", self.short_id())
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId::Static(1).to_string(), "static:1");
        assert_eq!(RecordId::Slot(7).to_string(), "slot:7");
    }

    #[test]
    fn record_id_slot_accessor() {
        assert_eq!(RecordId::Slot(3).slot(), Some(3));
        assert_eq!(RecordId::Static(0).slot(), None);
        assert!(RecordId::Static(0).is_static());
        assert!(!RecordId::Slot(0).is_static());
    }

    #[test]
    fn node_id_sequence() {
        let id = NodeId::ROOT;
        assert_eq!(id.as_u64(), 1);
        assert_eq!(id.next(), NodeId::new(2));
        assert!(id < id.next());
    }

    #[test]
    fn mount_ids_are_unique() {
        let a = MountId::new();
        let b = MountId::new();
        assert_ne!(a, b);
        assert_eq!(a.short_id().len(), 8);
    }

    #[test]
    fn record_id_serde_roundtrip() {
        let id = RecordId::Slot(12);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
