//! Read-side rendering of a record into its byte stream.

use std::ops::Range;

use cfs_store::Payload;

/// Render the full byte stream of a record showing `value`.
///
/// The counter line is always present. Text-mode records append the text
/// and a blank line.
pub fn render_payload(value: i64, payload: &Payload) -> Vec<u8> {
    let mut out = value.to_string().into_bytes();
    out.push(b'\n');
    if let Some(text) = payload.text() {
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(b"\n\n");
    }
    out
}

/// The slice of a `len`-byte payload that a read at `offset` returns.
///
/// Returns `None` at or past the end of the payload.
pub fn clamp(len: usize, offset: u64, max_len: usize) -> Option<Range<usize>> {
    let start = usize::try_from(offset).ok().filter(|&s| s < len)?;
    let end = start + max_len.min(len - start);
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfs_store::TextBuf;

    #[test]
    fn counter_payload_is_one_line() {
        assert_eq!(render_payload(1, &Payload::Counter), b"1\n");
        assert_eq!(render_payload(-3, &Payload::Counter), b"-3\n");
    }

    #[test]
    fn text_payload_appends_text_and_blank_line() {
        let payload = Payload::Text(TextBuf::from_bytes(b"hello"));
        assert_eq!(render_payload(12, &payload), b"12\nhello\n\n");
    }

    #[test]
    fn empty_text_still_adds_blank_line() {
        let payload = Payload::Text(TextBuf::empty());
        assert_eq!(render_payload(0, &payload), b"0\n\n\n");
    }

    #[test]
    fn clamp_within_payload() {
        assert_eq!(clamp(10, 0, 4), Some(0..4));
        assert_eq!(clamp(10, 8, 4), Some(8..10));
        assert_eq!(clamp(10, 3, 100), Some(3..10));
    }

    #[test]
    fn clamp_at_or_past_end_is_eof() {
        assert_eq!(clamp(10, 10, 4), None);
        assert_eq!(clamp(10, 11, 4), None);
        assert_eq!(clamp(0, 0, 4), None);
        assert_eq!(clamp(10, u64::MAX, 4), None);
    }

    #[test]
    fn clamp_zero_length_read() {
        assert_eq!(clamp(10, 2, 0), Some(2..2));
    }
}
