//! Crate-wide constants for the persisted store format and dictionary layout.

/// Magic bytes at the head of every persisted term store file.
pub const STORE_MAGIC: [u8; 8] = *b"BDICT1\0\0";

/// On-disk store format version. Bumped on any incompatible framing change.
pub const STORE_VERSION: u16 = 0x0001;

/// Per-record frame header: `[len: u32 LE][checksum: 32 bytes blake3]`.
pub const RECORD_HEADER_SIZE: usize = 36;

/// Byte length of the store file header (magic + version).
pub const STORE_HEADER_SIZE: u64 = 10;

/// Suffix of a published, queryable dictionary index.
pub const READY_SUFFIX: &str = ".dict";

/// Suffix of an in-progress build artifact. Sibling of the ready location;
/// promoted by a same-volume atomic rename.
pub const BUILDING_SUFFIX: &str = ".dict.building";

/// Verbose parsers emit one diagnostic per this many accepted entries.
pub const VERBOSE_REPORT_INTERVAL: u64 = 10_000;
