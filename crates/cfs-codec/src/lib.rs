//! Read/write protocol for counter filesystem content records.
//!
//! A record is exposed to callers as a byte stream:
//!
//! ```text
//! counter mode:  "<counter>\n"
//! text mode:     "<counter>\n<text>\n\n"
//! ```
//!
//! - **Reading** at offset 0 starts a new logical read and bumps the
//!   counter; reads at later offsets continue the same rendering without
//!   touching it, so a read-until-empty loop sees one increment.
//! - **Writing** replaces content. Input starting with an ASCII letter is
//!   stored as text; anything else is parsed as a decimal counter value.
//!
//! # Modules
//!
//! - [`codec`] - The [`Codec`] entry points for read and write
//! - [`render`] - Payload rendering and offset clamping
//! - [`parse`] - Scratch buffer, classification, and decimal parsing
//! - [`error`] - [`CodecError`]

pub mod codec;
pub mod error;
pub mod parse;
pub mod render;

pub use codec::Codec;
pub use error::{CodecError, CodecResult, CopyDirection};
pub use parse::{parse_decimal, Scratch, WriteKind};
pub use render::{clamp, render_payload};
