use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use cfs_store::RecordRef;
use cfs_tree::NodeRef;

use crate::error::MountResult;
use crate::ops::FileOperations;

/// One open session on a file: the file's record plus a read offset.
///
/// Writes do not move the offset. Every write replaces the record's
/// content as a whole.
pub struct FileHandle {
    node: NodeRef,
    record: RecordRef,
    ops: Arc<dyn FileOperations>,
    offset: u64,
}

impl FileHandle {
    pub(crate) fn new(node: NodeRef, record: RecordRef, ops: Arc<dyn FileOperations>) -> Self {
        Self {
            node,
            record,
            ops,
            offset: 0,
        }
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    pub fn record(&self) -> &RecordRef {
        &self.record
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Go back to offset 0; the next read starts a new logical read.
    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Copy up to `max_len` bytes into `sink`, advancing the offset.
    pub fn read_into(&mut self, max_len: usize, sink: &mut dyn Write) -> MountResult<usize> {
        self.ops.read(&self.record, &mut self.offset, max_len, sink)
    }

    /// Read up to `max_len` bytes into a new buffer.
    pub fn read_chunk(&mut self, max_len: usize) -> MountResult<Vec<u8>> {
        let mut out = Vec::new();
        self.read_into(max_len, &mut out)?;
        Ok(out)
    }

    /// Read `chunk` bytes at a time until a read returns nothing.
    pub fn drain(&mut self, chunk: usize) -> MountResult<Vec<u8>> {
        let mut out = Vec::new();
        while self.read_into(chunk.max(1), &mut out)? > 0 {}
        Ok(out)
    }

    /// Write `count` bytes taken from `source`.
    pub fn write_from(&mut self, source: &mut dyn Read, count: usize) -> MountResult<usize> {
        self.ops.write(&self.record, source, count)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> MountResult<usize> {
        let mut source = data;
        self.write_from(&mut source, data.len())
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let max_len = buf.len();
        let mut sink = buf;
        Ok(self.read_into(max_len, &mut sink)?)
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.node.path())
            .field("record", &self.record.id())
            .field("offset", &self.offset)
            .finish()
    }
}
