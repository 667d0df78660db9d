//! File entry definitions
//!
//! Defines the metadata record kept for each stored file.

use chrono::Local;

/// `strftime` pattern of the creation timestamp ("YYYY-MM-DD HH:MM:SS")
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single file in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique file name (1..=31 bytes)
    pub name: String,

    /// Logical length in bytes
    pub size: u64,

    /// Absolute image offset of the content, `None` while unallocated
    pub start: Option<u64>,

    /// Local creation time, fixed-width "YYYY-MM-DD HH:MM:SS"
    pub created: String,
}

impl Entry {
    /// Create an empty, unallocated entry stamped with the current local time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            start: None,
            created: Local::now().format(CREATED_FORMAT).to_string(),
        }
    }

    /// Occupied `[start, end)` range of a live entry
    pub fn range(&self) -> Option<(u64, u64)> {
        match self.start {
            Some(start) if self.size > 0 => Some((start, start.saturating_add(self.size))),
            _ => None,
        }
    }

    /// Drop the allocation (size 0, no start)
    pub fn clear(&mut self) {
        self.size = 0;
        self.start = None;
    }
}
