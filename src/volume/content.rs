//! Content Operations
//!
//! Write, append, read, truncate, copy and compare file contents.

use crate::allocator;
use crate::error::{FsError, Result};
use crate::oplog::OpKind;

use super::Volume;

/// Result of comparing two files byte by byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same size and same bytes
    Identical,

    /// Sizes differ (contents are not compared)
    SizeMismatch { left: u64, right: u64 },

    /// First differing byte
    ContentMismatch { offset: u64, left: u8, right: u8 },
}

impl Volume {
    // =========================================================================
    // Write / Append
    // =========================================================================

    /// Replace the contents of a file
    ///
    /// - Empty `data` truncates to zero and frees the allocation.
    /// - If the current allocation is at least as large, the bytes are
    ///   overwritten in place and the size shrinks to `data.len()`.
    /// - Otherwise a new span is allocated first-fit. The old range still
    ///   counts as occupied during that search, so a file is never grown in
    ///   place even when the space after it is free.
    ///
    /// Errors: `NotFound`, `OutOfSpace` (defragmenting may help), `Io`.
    pub fn write(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let result = self.write_content(name, data);
        self.record(OpKind::Write, Some(name), result.is_ok());
        result
    }

    pub(super) fn write_content(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let entry = self.entry_ref(name)?.clone();
        let len = data.len() as u64;
        let previous = self.table.clone();

        if len == 0 {
            self.entry_mut(name)?.clear();
        } else if let Some(start) = entry.start.filter(|_| entry.size >= len) {
            // Shrink-or-equal in place; bytes past `len` become slack
            self.image.write_at(start, data)?;
            self.entry_mut(name)?.size = len;
        } else {
            let start = allocator::find_free_span(self.table.entries(), &self.layout, len)
                .ok_or(FsError::OutOfSpace { requested: len })?;
            self.image.write_at(start, data)?;

            let entry = self.entry_mut(name)?;
            entry.start = Some(start);
            entry.size = len;
        }

        self.commit_or_restore(previous)?;
        tracing::debug!("Wrote {} bytes to '{}'", len, name);
        Ok(())
    }

    /// Append bytes directly after the end of a file
    ///
    /// An empty file behaves exactly like `write`. Otherwise the file only
    /// grows into the free space that immediately follows it; it is never
    /// relocated, and `OutOfSpace` is returned when that space is too small.
    pub fn append(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let result = self.append_content(name, data);
        self.record(OpKind::Append, Some(name), result.is_ok());
        result
    }

    fn append_content(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let entry = self.entry_ref(name)?.clone();
        if data.is_empty() {
            return Err(FsError::InvalidArgument(
                "append needs at least one byte".to_string(),
            ));
        }

        if entry.size == 0 {
            return self.write_content(name, data);
        }

        let start = entry.start.ok_or_else(|| {
            FsError::Corruption(format!("'{}' has {} bytes but no start", name, entry.size))
        })?;
        let len = data.len() as u64;
        let tail = start + entry.size;
        let ceiling = allocator::next_start_after(self.table.entries(), &self.layout, start);

        if ceiling.saturating_sub(tail) < len {
            return Err(FsError::OutOfSpace { requested: len });
        }

        let previous = self.table.clone();
        self.image.write_at(tail, data)?;
        self.entry_mut(name)?.size += len;
        self.commit_or_restore(previous)?;

        tracing::debug!("Appended {} bytes to '{}'", len, name);
        Ok(())
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Read up to `length` bytes starting at `offset`
    ///
    /// `offset` must lie inside the file (`RangeError` otherwise, including
    /// at exactly the end). The length is clamped to what remains.
    pub fn read(&self, name: &str, offset: u64, length: u64) -> Result<Vec<u8>> {
        let result = self.read_content(name, offset, length);
        self.record(OpKind::Read, Some(name), result.is_ok());
        result
    }

    fn read_content(&self, name: &str, offset: u64, length: u64) -> Result<Vec<u8>> {
        let entry = self.entry_ref(name)?;
        if offset >= entry.size {
            return Err(FsError::RangeError {
                offset,
                size: entry.size,
            });
        }

        let len = length.min(entry.size - offset);
        if len == 0 {
            return Ok(Vec::new());
        }

        let start = entry.start.ok_or_else(|| {
            FsError::Corruption(format!("'{}' has {} bytes but no start", name, entry.size))
        })?;

        let mut buf = vec![0u8; len as usize];
        self.image.read_at(start + offset, &mut buf)?;
        Ok(buf)
    }

    /// Whole contents of a file (empty for an empty file)
    pub fn cat(&self, name: &str) -> Result<Vec<u8>> {
        let result = self.read_all(name);
        self.record(OpKind::Cat, Some(name), result.is_ok());
        result
    }

    fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        let size = self.entry_ref(name)?.size;
        if size == 0 {
            return Ok(Vec::new());
        }
        self.read_content(name, 0, size)
    }

    // =========================================================================
    // Truncate
    // =========================================================================

    /// Shrink a file to `new_size` bytes
    ///
    /// Only the logical size changes; the dropped bytes stay on disk as
    /// slack. Truncating to zero frees the allocation. Growing is refused.
    pub fn truncate(&mut self, name: &str, new_size: u64) -> Result<()> {
        let result = self.truncate_content(name, new_size);
        self.record(OpKind::Truncate, Some(name), result.is_ok());
        result
    }

    fn truncate_content(&mut self, name: &str, new_size: u64) -> Result<()> {
        let size = self.entry_ref(name)?.size;
        if new_size > size {
            return Err(FsError::InvalidArgument(format!(
                "cannot grow '{}' from {} to {} bytes (use write/append to grow)",
                name, size, new_size
            )));
        }
        if new_size == size {
            return Ok(());
        }

        let previous = self.table.clone();
        let entry = self.entry_mut(name)?;
        if new_size == 0 {
            entry.clear();
        } else {
            entry.size = new_size;
        }
        self.commit_or_restore(previous)?;

        tracing::debug!("Truncated '{}' to {} bytes", name, new_size);
        Ok(())
    }

    // =========================================================================
    // Copy / Compare
    // =========================================================================

    /// Copy `src` into a new file `dest`
    ///
    /// If anything fails after `dest` was created, `dest` is deleted again
    /// (best effort) and the original error is returned.
    pub fn copy(&mut self, src: &str, dest: &str) -> Result<()> {
        let result = self.copy_file(src, dest);
        self.record(OpKind::Copy, Some(src), result.is_ok());
        result
    }

    fn copy_file(&mut self, src: &str, dest: &str) -> Result<()> {
        let size = self.entry_ref(src)?.size;
        if self.table.contains(dest) {
            return Err(FsError::AlreadyExists(dest.to_string()));
        }

        self.create_entry(dest)?;
        if size == 0 {
            return Ok(());
        }

        let filled = self
            .read_content(src, 0, size)
            .and_then(|bytes| self.write_content(dest, &bytes));

        if let Err(e) = filled {
            if let Err(cleanup) = self.delete_entry(dest) {
                tracing::warn!("Failed to remove partial copy '{}': {}", dest, cleanup);
            }
            return Err(e);
        }

        tracing::debug!("Copied '{}' -> '{}' ({} bytes)", src, dest, size);
        Ok(())
    }

    /// Compare two files byte by byte
    pub fn diff(&self, left: &str, right: &str) -> Result<Comparison> {
        let result = self.compare(left, right);
        let success = matches!(result, Ok(Comparison::Identical));
        self.record(OpKind::Diff, Some(left), success);
        result
    }

    fn compare(&self, left: &str, right: &str) -> Result<Comparison> {
        let left_size = self.entry_ref(left)?.size;
        let right_size = self.entry_ref(right)?.size;
        if left_size != right_size {
            return Ok(Comparison::SizeMismatch {
                left: left_size,
                right: right_size,
            });
        }

        let a = self.read_all(left)?;
        let b = self.read_all(right)?;
        Ok(a
            .iter()
            .zip(&b)
            .position(|(x, y)| x != y)
            .map_or(Comparison::Identical, |i| Comparison::ContentMismatch {
                offset: i as u64,
                left: a[i],
                right: b[i],
            }))
    }
}
