//! Operation Log Writer
//!
//! Handles appending entries to the log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{LogEntry, OpKind, OpLogReader};
use crate::error::Result;

/// Appends entries to the operation log
pub struct OpLogWriter {
    file: File,
    path: PathBuf,
    next_seq: u64,
}

impl OpLogWriter {
    /// Open or create a log file, continuing its sequence numbers
    ///
    /// A torn frame at the end of an existing log is cut off so new entries
    /// stay reachable.
    pub fn open(path: &Path) -> Result<Self> {
        let mut next_seq = 1;
        let mut torn_at = None;

        if path.exists() {
            let mut reader = OpLogReader::open(path)?;
            if let Some(last) = reader.by_ref().last() {
                next_seq = last.seq + 1;
            }
            if reader.stats().truncated_tail {
                torn_at = Some(reader.position() as u64);
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if let Some(len) = torn_at {
            tracing::warn!("Cutting torn tail of {} at byte {}", path.display(), len);
            file.set_len(len)?;
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
            next_seq,
        })
    }

    /// Append an entry and return its sequence number
    pub fn append(
        &mut self,
        operation: OpKind,
        subject: Option<&str>,
        success: bool,
    ) -> Result<u64> {
        let entry = LogEntry::new(self.next_seq, operation, subject, success);
        let frame = entry.serialize()?;

        self.file.write_all(&frame)?;
        self.file.flush()?;

        self.next_seq += 1;
        Ok(entry.seq)
    }

    /// Sequence number the next entry will get
    pub fn current_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
