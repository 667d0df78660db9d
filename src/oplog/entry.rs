//! Operation log entry definitions
//!
//! Defines the structure of individual log entries and their framing.

use std::fmt;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{FsError, Result};
use crate::table::CREATED_FORMAT;

/// Frame header size: Len (4) + CRC (4)
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest payload accepted when reading a frame back
pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024;

/// Operations that can be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    Create,
    Delete,
    Write,
    Append,
    Read,
    List,
    Format,
    Rename,
    Exists,
    Size,
    Truncate,
    Copy,
    Move,
    Defragment,
    Check,
    Backup,
    Restore,
    Cat,
    Diff,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Delete => "delete",
            OpKind::Write => "write",
            OpKind::Append => "append",
            OpKind::Read => "read",
            OpKind::List => "ls",
            OpKind::Format => "format",
            OpKind::Rename => "rename",
            OpKind::Exists => "exists",
            OpKind::Size => "size",
            OpKind::Truncate => "truncate",
            OpKind::Copy => "copy",
            OpKind::Move => "mv",
            OpKind::Defragment => "defragment",
            OpKind::Check => "check",
            OpKind::Backup => "backup",
            OpKind::Restore => "restore",
            OpKind::Cat => "cat",
            OpKind::Diff => "diff",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the operation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Sequence number - monotonically increasing
    pub seq: u64,

    /// Timestamp (unix seconds) when the operation finished
    pub timestamp: i64,

    /// The operation performed
    pub operation: OpKind,

    /// File name or path the operation acted on, if any
    pub subject: Option<String>,

    /// Whether the operation succeeded
    pub success: bool,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(seq: u64, operation: OpKind, subject: Option<&str>, success: bool) -> Self {
        Self {
            seq,
            timestamp: Local::now().timestamp(),
            operation,
            subject: subject.map(str::to_string),
            success,
        }
    }

    /// Encode as a complete frame: [len][crc][payload]
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode a frame payload after checking it against the stored CRC
    pub fn deserialize(payload: &[u8], crc: u32) -> Result<Self> {
        let computed = crc32fast::hash(payload);
        if computed != crc {
            return Err(FsError::Serialization(format!(
                "log entry CRC mismatch: stored {:#010x}, computed {:#010x}",
                crc, computed
            )));
        }
        Ok(bincode::deserialize(payload)?)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Local.timestamp_opt(self.timestamp, 0).single() {
            Some(time) => write!(f, "{}", time.format(CREATED_FORMAT))?,
            None => write!(f, "@{}", self.timestamp)?,
        }

        write!(f, " - {}", self.operation)?;
        if let Some(subject) = &self.subject {
            write!(f, ": {}", subject)?;
        }
        f.write_str(if self.success { " SUCCESS" } else { " FAIL" })
    }
}
