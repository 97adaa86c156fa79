//! Write-side decoding: scratch buffer, classification, decimal parsing.

use std::io::{self, Read};

use cfs_store::TextBuf;
use cfs_types::TEXT_CAPACITY;

/// What a write turns into once classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteKind {
    /// Store this value in the counter.
    Number(i64),
    /// Store this text and switch to text mode.
    Text(TextBuf),
}

/// Zero-padded copy of the first [`TEXT_CAPACITY`] bytes of a write.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scratch {
    buf: [u8; TEXT_CAPACITY],
    filled: usize,
}

impl Scratch {
    /// Copy the leading bytes of `input`; the rest is ignored.
    pub fn from_bytes(input: &[u8]) -> Self {
        let filled = input.len().min(TEXT_CAPACITY);
        let mut buf = [0; TEXT_CAPACITY];
        buf[..filled].copy_from_slice(&input[..filled]);
        Self { buf, filled }
    }

    /// Read the leading bytes of a `count`-byte write from `source`.
    pub fn fill_from<R: Read + ?Sized>(source: &mut R, count: usize) -> io::Result<Self> {
        let filled = count.min(TEXT_CAPACITY);
        let mut buf = [0; TEXT_CAPACITY];
        source.read_exact(&mut buf[..filled])?;
        Ok(Self { buf, filled })
    }

    /// Bytes actually copied in.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Letters mean text; everything else, including an empty write, is a
    /// number.
    pub fn classify(&self) -> WriteKind {
        if self.buf[0].is_ascii_alphabetic() {
            WriteKind::Text(TextBuf::from_bytes(&self.buf))
        } else {
            WriteKind::Number(parse_decimal(&self.buf))
        }
    }
}

impl std::fmt::Debug for Scratch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scratch({:?})", String::from_utf8_lossy(self.filled()))
    }
}

/// Best-effort base-10 parse in the manner of `strtol`.
///
/// Skips leading whitespace, accepts one optional sign, then consumes
/// digits up to the first non-digit. No digits yields 0. Values past the
/// `i64` range saturate.
pub fn parse_decimal(bytes: &[u8]) -> i64 {
    let mut rest = bytes;
    while let [b' ' | b'\t'..=b'\r', tail @ ..] = rest {
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
