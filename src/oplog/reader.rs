//! Operation Log Reader
//!
//! Replays entries from the log file.

use std::fs;
use std::path::Path;

use super::{LogEntry, FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE};
use crate::error::Result;

/// Outcome of a replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    /// Entries decoded successfully
    pub entries_read: u64,

    /// Frames skipped because of a CRC or decode failure
    pub entries_corrupted: u64,

    /// Whether the file ended in the middle of a frame
    pub truncated_tail: bool,
}

/// Iterates over the valid entries of a log
///
/// Corrupt frames are skipped and counted; a torn or implausible frame ends
/// the iteration since nothing after it can be located reliably.
pub struct OpLogReader {
    data: Vec<u8>,
    position: usize,
    stats: ReplayStats,
}

impl OpLogReader {
    /// Load a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// Read a log already held in memory
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            stats: ReplayStats::default(),
        }
    }

    /// Replay a whole log file
    pub fn replay(path: &Path) -> Result<(Vec<LogEntry>, ReplayStats)> {
        let mut reader = Self::open(path)?;
        let entries: Vec<LogEntry> = reader.by_ref().collect();
        Ok((entries, reader.stats))
    }

    /// Statistics for the frames consumed so far
    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Byte offset just past the last frame consumed
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for OpLogReader {
    type Item = LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let remaining = &self.data[self.position..];
            if remaining.is_empty() {
                return None;
            }

            if remaining.len() < FRAME_HEADER_SIZE {
                self.stats.truncated_tail = true;
                return None;
            }

            let len = u32::from_le_bytes([remaining[0], remaining[1], remaining[2], remaining[3]]);
            let crc = u32::from_le_bytes([remaining[4], remaining[5], remaining[6], remaining[7]]);

            if len > MAX_PAYLOAD_SIZE || remaining.len() < FRAME_HEADER_SIZE + len as usize {
                self.stats.truncated_tail = true;
                return None;
            }

            let payload = &remaining[FRAME_HEADER_SIZE..FRAME_HEADER_SIZE + len as usize];
            self.position += FRAME_HEADER_SIZE + len as usize;

            match LogEntry::deserialize(payload, crc) {
                Ok(entry) => {
                    self.stats.entries_read += 1;
                    return Some(entry);
                }
                Err(e) => {
                    tracing::debug!("Skipping corrupt log frame: {}", e);
                    self.stats.entries_corrupted += 1;
                }
            }
        }
    }
}
