//! Metadata Module
//!
//! Persists the file table in the fixed-size metadata block at the start of
//! the image.
//!
//! ## Responsibilities
//! - Encode/decode the table to a zero-padded block
//! - Detect corrupt blocks (magic, version, CRC32)
//! - Load the table at startup, degrading to an empty table on any fault
//! - Commit the whole block and fsync after every mutation
//!
//! ## Block Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (10 bytes)                                       │
//! │   Magic: "SFS1" (4) | Version: u16 (2) | Count: u32 (4) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Records (60 bytes each, `Count` of them)                │
//! │   Name [u8; 32] | Size: u32 | Start: u32 | Created [20] │
//! │   (Start = u32::MAX means unallocated)                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                        │
//! │   CRC32 over header + records                           │
//! ├─────────────────────────────────────────────────────────┤
//! │ Zero padding up to the metadata block size              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

mod codec;
mod store;

pub use codec::{decode_table, encode_table};
pub use store::{commit, load, LoadOutcome};

// =============================================================================
// Shared Constants (used by codec and layout validation)
// =============================================================================

/// Magic bytes identifying a simfs metadata block
pub(crate) const MAGIC: &[u8; 4] = b"SFS1";

/// Current metadata format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Count (4) = 10 bytes
pub(crate) const HEADER_SIZE: usize = 10;

/// On-disk name field (31 name bytes + NUL)
pub(crate) const NAME_FIELD: usize = 32;

/// On-disk creation timestamp field (19 chars + NUL)
pub(crate) const CREATED_FIELD: usize = 20;

/// Record size: Name (32) + Size (4) + Start (4) + Created (20) = 60 bytes
pub(crate) const RECORD_SIZE: usize = NAME_FIELD + 4 + 4 + CREATED_FIELD;

/// Footer size: CRC32 (4)
pub(crate) const FOOTER_SIZE: usize = 4;

/// Sentinel start offset of an unallocated entry
pub(crate) const UNALLOCATED: u32 = u32::MAX;

/// Encoded size of a table holding `count` entries (without padding)
pub fn encoded_len(count: usize) -> usize {
    HEADER_SIZE + count * RECORD_SIZE + FOOTER_SIZE
}
