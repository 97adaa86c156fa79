use std::io::{self, Read, Write};

use tracing::debug;

use cfs_store::ContentRecord;
use cfs_types::{ContentMode, ModePolicy};

use crate::error::{CodecError, CodecResult};
use crate::parse::{Scratch, WriteKind};
use crate::render::{clamp, render_payload};

/// Reads and writes content records as byte streams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Codec {
    policy: ModePolicy,
}

impl Codec {
    pub fn new(policy: ModePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    /// Copy up to `max_len` bytes of the record's stream, starting at
    /// `*offset`, into `sink`, and advance `*offset` by the bytes copied.
    ///
    /// A read at offset 0 opens a new logical read and increments the
    /// counter; the rendering shows the incremented value. Reads at later
    /// offsets show the counter as it stands, which is the value the opening
    /// read showed unless a write came in between. At or past the end of
    /// the stream nothing is copied and `Ok(0)` is returned.
    ///
    /// If `sink` fails, the increment is undone and the offset is left
    /// unchanged. A zero-length read does nothing.
    pub fn read<W: Write + ?Sized>(
        &self,
        record: &ContentRecord,
        offset: &mut u64,
        max_len: usize,
        sink: &mut W,
    ) -> CodecResult<usize> {
        if max_len == 0 {
            return Ok(0);
        }
        let opening = *offset == 0;
        let value = if opening {
            record.increment()
        } else {
            record.counter()
        };
        let payload = record.with_payload(|p| render_payload(value, p));

        let Some(range) = clamp(payload.len(), *offset, max_len) else {
            return Ok(0);
        };
        let copied = range.len();
        if let Err(e) = sink.write_all(&payload[range]) {
            if opening {
                record.decrement();
            }
            return Err(CodecError::to_caller(e));
        }

        *offset += copied as u64;
        Ok(copied)
    }

    /// [`read`](Self::read) into a fresh buffer.
    pub fn read_to_vec(
        &self,
        record: &ContentRecord,
        offset: &mut u64,
        max_len: usize,
    ) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.read(record, offset, max_len, &mut out)?;
        Ok(out)
    }

    /// Replace the record's content with a `count`-byte write read from
    /// `source`, and report all `count` bytes as consumed.
    ///
    /// Only the first [`TEXT_CAPACITY`](cfs_types::TEXT_CAPACITY) bytes are
    /// meaningful; the remainder is read and discarded. A source that fails
    /// or ends early is a copy fault and leaves the record untouched.
    pub fn write<R: Read + ?Sized>(
        &self,
        record: &ContentRecord,
        source: &mut R,
        count: usize,
    ) -> CodecResult<usize> {
        let scratch = Scratch::fill_from(source, count).map_err(CodecError::from_caller)?;

        let rest = (count - scratch.filled().len()) as u64;
        if rest > 0 {
            let skipped = io::copy(&mut (&mut *source).take(rest), &mut io::sink())
                .map_err(CodecError::from_caller)?;
            if skipped != rest {
                return Err(CodecError::from_caller(io::ErrorKind::UnexpectedEof.into()));
            }
        }

        self.apply(record, scratch.classify());
        Ok(count)
    }

    /// [`write`](Self::write) from an in-memory buffer.
    pub fn write_bytes(&self, record: &ContentRecord, input: &[u8]) -> CodecResult<usize> {
        let mut source = input;
        self.write(record, &mut source, input.len())
    }

    fn apply(&self, record: &ContentRecord, kind: WriteKind) {
        match kind {
            WriteKind::Number(value) => {
                record.set_counter(value);
                if self.policy == ModePolicy::Revert
                    && record.clear_text() == ContentMode::Text
                {
                    debug!(record = %record.id(), "record reverted to counter mode");
                }
            }
            WriteKind::Text(text) => {
                if record.set_text(text) == ContentMode::Counter {
                    debug!(record = %record.id(), len = text.len(), "record switched to text mode");
                }
            }
        }
    }
}
