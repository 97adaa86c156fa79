use std::fmt;
use std::io::{Read, Write};

use cfs_codec::Codec;
use cfs_store::{ContentRecord, RecordRef};
use cfs_tree::NodeRef;

use crate::error::{MountError, MountResult};

/// Operations the host dispatches to for an open file.
///
/// Bound to each file node when it is published to the host.
pub trait FileOperations: Send + Sync + fmt::Debug {
    /// Resolve the record a new handle on `node` will use.
    fn open(&self, node: &NodeRef) -> MountResult<RecordRef>;

    /// Copy up to `max_len` bytes at `*offset` into `sink`.
    fn read(
        &self,
        record: &ContentRecord,
        offset: &mut u64,
        max_len: usize,
        sink: &mut dyn Write,
    ) -> MountResult<usize>;

    /// Consume `count` bytes from `source` as one write.
    fn write(
        &self,
        record: &ContentRecord,
        source: &mut dyn Read,
        count: usize,
    ) -> MountResult<usize>;
}

/// Routes file operations into the counter [`Codec`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CounterFileOps {
    codec: Codec,
}

impl CounterFileOps {
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }
}

impl FileOperations for CounterFileOps {
    fn open(&self, node: &NodeRef) -> MountResult<RecordRef> {
        node.record().cloned().ok_or_else(|| MountError::IsADirectory { path: node.path() })
    }

    fn read(
        &self,
        record: &ContentRecord,
        offset: &mut u64,
        max_len: usize,
        sink: &mut dyn Write,
    ) -> MountResult<usize> {
        Ok(self.codec.read(record, offset, max_len, sink)?)
    }

    fn write(
        &self,
        record: &ContentRecord,
        source: &mut dyn Read,
        count: usize,
    ) -> MountResult<usize> {
        Ok(self.codec.write(record, source, count)?)
    }
}
