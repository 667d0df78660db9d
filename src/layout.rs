//! Image Layout
//!
//! Geometry of the backing image: a fixed-size metadata block followed by
//! the data region.
//!
//! ```text
//! 0                meta_size                                 total_size
//! ┌────────────────┬─────────────────────────────────────────────┐
//! │ Metadata block │ Data region (raw file contents)             │
//! └────────────────┴─────────────────────────────────────────────┘
//! ```
//!
//! All entry offsets are absolute image offsets, so a live `start` always
//! lies in `[meta_size, total_size)`.

use crate::error::{FsError, Result};
use crate::metadata;

/// Default image size (1 MiB)
pub const DEFAULT_TOTAL_SIZE: u64 = 1024 * 1024;

/// Default metadata block size (4 KiB)
pub const DEFAULT_META_SIZE: u64 = 4096;

/// Default file table capacity
pub const DEFAULT_MAX_FILES: usize = 64;

/// Longest file name in bytes (one byte of the on-disk field is reserved for NUL)
pub const MAX_NAME_LEN: usize = 31;

/// Fixed geometry of a volume image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    total_size: u64,
    meta_size: u64,
    max_files: usize,
}

impl Layout {
    /// Create a validated layout
    ///
    /// The metadata block must hold a full table of `max_files` entries, the
    /// data region must be non-empty and every offset must fit the 32-bit
    /// on-disk fields.
    pub fn new(total_size: u64, meta_size: u64, max_files: usize) -> Result<Self> {
        if max_files == 0 {
            return Err(FsError::Config("max_files must be at least 1".to_string()));
        }

        let table_len = metadata::encoded_len(max_files) as u64;
        if table_len > meta_size {
            return Err(FsError::Config(format!(
                "metadata block of {} bytes cannot hold {} entries ({} bytes needed)",
                meta_size, max_files, table_len
            )));
        }

        if total_size <= meta_size {
            return Err(FsError::Config(format!(
                "image size {} leaves no data region after {} bytes of metadata",
                total_size, meta_size
            )));
        }

        // u32::MAX itself is the on-disk "unallocated" marker
        if total_size >= u32::MAX as u64 {
            return Err(FsError::Config(format!(
                "image size {} exceeds the 32-bit offset range",
                total_size
            )));
        }

        Ok(Self {
            total_size,
            meta_size,
            max_files,
        })
    }

    /// Total image size in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Metadata block size in bytes
    pub fn meta_size(&self) -> u64 {
        self.meta_size
    }

    /// File table capacity
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// First byte of the data region (absolute)
    pub fn data_start(&self) -> u64 {
        self.meta_size
    }

    /// One past the last byte of the data region (absolute)
    pub fn data_end(&self) -> u64 {
        self.total_size
    }

    /// Data region size in bytes
    pub fn data_size(&self) -> u64 {
        self.total_size - self.meta_size
    }

    /// Whether `[start, start + len)` lies inside the data region
    pub fn contains_range(&self, start: u64, len: u64) -> bool {
        start >= self.data_start()
            && start < self.data_end()
            && start
                .checked_add(len)
                .map_or(false, |end| end <= self.data_end())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            total_size: DEFAULT_TOTAL_SIZE,
            meta_size: DEFAULT_META_SIZE,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}
