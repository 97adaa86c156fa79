//! The content record: the logical value behind one file.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use cfs_types::{ContentMode, RecordId, TEXT_CAPACITY};

/// Shared handle to a record. The store keeps one clone for the life of the
/// mount, so a handle never outlives its record's slot.
pub type RecordRef = Arc<ContentRecord>;

/// Fixed-capacity text payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextBuf {
    bytes: [u8; TEXT_CAPACITY],
    len: usize,
}

impl TextBuf {
    /// An empty text.
    pub const fn empty() -> Self {
        Self {
            bytes: [0; TEXT_CAPACITY],
            len: 0,
        }
    }

    /// Copy `src` up to its first NUL byte, truncated to [`TEXT_CAPACITY`].
    pub fn from_bytes(src: &[u8]) -> Self {
        let end = src
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(src.len())
            .min(TEXT_CAPACITY);
        let mut bytes = [0; TEXT_CAPACITY];
        bytes[..end].copy_from_slice(&src[..end]);
        Self { bytes, len: end }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for TextBuf {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for TextBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextBuf({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// The mode-dependent part of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Payload {
    #[default]
    Counter,
    Text(TextBuf),
}

impl Payload {
    pub fn mode(&self) -> ContentMode {
        match self {
            Payload::Counter => ContentMode::Counter,
            Payload::Text(_) => ContentMode::Text,
        }
    }

    pub fn text(&self) -> Option<&TextBuf> {
        match self {
            Payload::Counter => None,
            Payload::Text(text) => Some(text),
        }
    }
}

/// One file's content: an atomic counter and a lock-guarded payload.
pub struct ContentRecord {
    id: RecordId,
    counter: AtomicI64,
    payload: Mutex<Payload>,
}

impl ContentRecord {
    /// A counter-mode record starting at `counter`.
    pub fn new(id: RecordId, counter: i64) -> Self {
        Self {
            id,
            counter: AtomicI64::new(counter),
            payload: Mutex::new(Payload::Counter),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Current counter value.
    pub fn counter(&self) -> i64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Atomically add one and return the new value. Wraps at `i64::MAX`.
    pub fn increment(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
    }

    /// Atomically subtract one and return the new value. Wraps at `i64::MIN`.
    pub fn decrement(&self) -> i64 {
        self.counter.fetch_sub(1, Ordering::SeqCst).wrapping_sub(1)
    }

    /// Atomically replace the counter.
    pub fn set_counter(&self, value: i64) {
        self.counter.store(value, Ordering::SeqCst);
    }

    pub fn mode(&self) -> ContentMode {
        self.lock().mode()
    }

    /// A copy of the stored text, if the record is in text mode.
    pub fn text(&self) -> Option<TextBuf> {
        self.lock().text().copied()
    }

    /// Store `text` and switch to text mode. Returns the previous mode.
    pub fn set_text(&self, text: TextBuf) -> ContentMode {
        let mut payload = self.lock();
        let previous = payload.mode();
        *payload = Payload::Text(text);
        previous
    }

    /// Drop any text and return to counter mode. Returns the previous mode.
    pub fn clear_text(&self) -> ContentMode {
        let mut payload = self.lock();
        let previous = payload.mode();
        *payload = Payload::Counter;
        previous
    }

    /// Run `f` against the payload while holding the record lock.
    pub fn with_payload<R>(&self, f: impl FnOnce(&Payload) -> R) -> R {
        f(&self.lock())
    }

    /// Point-in-time view for display.
    pub fn snapshot(&self) -> RecordSnapshot {
        let payload = *self.lock();
        RecordSnapshot {
            id: self.id,
            counter: self.counter(),
            mode: payload.mode(),
            text: payload
                .text()
                .map(|t| String::from_utf8_lossy(t.as_bytes()).into_owned()),
        }
    }

    /// Reinitialize a slot that is about to be handed out.
    pub(crate) fn reset(&self, counter: i64) {
        *self.lock() = Payload::Counter;
        self.set_counter(counter);
    }

    // Every payload update is a whole-value replacement, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, Payload> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ContentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRecord")
            .field("id", &self.id)
            .field("counter", &self.counter())
            .field("mode", &self.mode())
            .finish()
    }
}

/// Serializable view of a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub counter: i64,
    pub mode: ContentMode,
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ContentRecord {
        ContentRecord::new(RecordId::Slot(0), 0)
    }

    // -----------------------------------------------------------------------
    // TextBuf
    // -----------------------------------------------------------------------

    #[test]
    fn text_stops_at_nul() {
        let text = TextBuf::from_bytes(b"abc\0def");
        assert_eq!(text.as_bytes(), b"abc");
        assert_eq!(text.len(), 3);
    }

    #[test]
    fn text_truncates_to_capacity() {
        let long = [b'x'; TEXT_CAPACITY + 20];
        let text = TextBuf::from_bytes(&long);
        assert_eq!(text.len(), TEXT_CAPACITY);
    }

    #[test]
    fn empty_text() {
        assert!(TextBuf::empty().is_empty());
        assert!(TextBuf::from_bytes(b"\0abc").is_empty());
        assert_eq!(TextBuf::default(), TextBuf::empty());
    }

    // -----------------------------------------------------------------------
    // Counter
    // -----------------------------------------------------------------------

    #[test]
    fn new_record_is_counter_mode() {
        let r = record();
        assert_eq!(r.counter(), 0);
        assert_eq!(r.mode(), ContentMode::Counter);
        assert!(r.text().is_none());
    }

    #[test]
    fn increment_returns_new_value() {
        let r = record();
        assert_eq!(r.increment(), 1);
        assert_eq!(r.increment(), 2);
        assert_eq!(r.counter(), 2);
        assert_eq!(r.decrement(), 1);
    }

    #[test]
    fn counter_wraps_at_the_edges() {
        let r = record();
        r.set_counter(i64::MAX);
        assert_eq!(r.increment(), i64::MIN);
        assert_eq!(r.decrement(), i64::MAX);
        assert_eq!(r.counter(), i64::MAX);
    }

    #[test]
    fn set_counter_overwrites() {
        let r = record();
        r.increment();
        r.set_counter(42);
        assert_eq!(r.counter(), 42);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        use std::thread;

        let r = Arc::new(record());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        r.increment();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(r.counter(), 8000);
    }

    // -----------------------------------------------------------------------
    // Payload
    // -----------------------------------------------------------------------

    #[test]
    fn set_text_switches_mode() {
        let r = record();
        let previous = r.set_text(TextBuf::from_bytes(b"hello"));
        assert_eq!(previous, ContentMode::Counter);
        assert_eq!(r.mode(), ContentMode::Text);
        assert_eq!(r.text().unwrap().as_bytes(), b"hello");
    }

    #[test]
    fn clear_text_returns_to_counter() {
        let r = record();
        r.set_text(TextBuf::from_bytes(b"hello"));
        assert_eq!(r.clear_text(), ContentMode::Text);
        assert_eq!(r.mode(), ContentMode::Counter);
        assert!(r.text().is_none());
    }

    #[test]
    fn reset_restores_fresh_state() {
        let r = record();
        r.set_counter(9);
        r.set_text(TextBuf::from_bytes(b"old"));
        r.reset(3);
        assert_eq!(r.counter(), 3);
        assert_eq!(r.mode(), ContentMode::Counter);
    }

    #[test]
    fn snapshot_reflects_state() {
        let r = record();
        r.set_counter(5);
        r.set_text(TextBuf::from_bytes(b"note"));
        let snap = r.snapshot();
        assert_eq!(snap.id, RecordId::Slot(0));
        assert_eq!(snap.counter, 5);
        assert_eq!(snap.mode, ContentMode::Text);
        assert_eq!(snap.text.as_deref(), Some("note"));

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"text\":\"note\""));
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", record());
        assert!(debug.contains("ContentRecord"));
        assert!(debug.contains("slot:0"));
    }
}
