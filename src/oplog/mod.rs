//! Operation Log Module
//!
//! Append-only record of every volume operation and its outcome.
//!
//! ## Responsibilities
//! - Append one timestamped entry per operation
//! - CRC32 checksums for corruption detection
//! - Sequence numbers for ordering
//! - Replay on demand (corrupt frames skipped, torn tail ignored)
//!
//! The log is a side channel: a failure to record never fails the operation
//! being recorded.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬─────────────────┐ │
//! │ │ Len (4) │ CRC (4) │ bincode(entry)  │ │
//! │ └─────────┴─────────┴─────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2                                 │
//! │ ┌─────────┬─────────┬─────────────────┐ │
//! │ │ Len (4) │ CRC (4) │ bincode(entry)  │ │
//! │ └─────────┴─────────┴─────────────────┘ │
//! └─────────────────────────────────────────┘
//! ```

mod entry;
mod reader;
mod writer;

pub use entry::{LogEntry, OpKind, FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use reader::{OpLogReader, ReplayStats};
pub use writer::OpLogWriter;
