//! Fixed limits of the filesystem.

/// Bytes of text a content record can hold. Also the size of the write
/// scratch buffer: input beyond this many bytes is ignored.
pub const TEXT_CAPACITY: usize = 50;

/// Number of dynamically created files a mount can hold by default.
pub const DEFAULT_CAPACITY: usize = 50;

/// Largest store a mount accepts. Slots are preallocated, so this bounds
/// the memory a config can ask for.
pub const MAX_CAPACITY: usize = 1 << 16;

/// Filesystem magic reported by `statfs`.
pub const FS_MAGIC: u32 = 0x1998_0122;

/// Block size reported by `statfs`.
pub const BLOCK_SIZE: u32 = 4096;

/// Longest accepted node name, in bytes.
pub const NAME_MAX: usize = 255;
