//! Maintenance Operations
//!
//! Format, backup and restore of the whole image.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::Path;

use crate::error::{FsError, Result};
use crate::image::ImageState;
use crate::metadata;
use crate::oplog::OpKind;
use crate::table::Table;

use super::Volume;

/// Zero-fill chunk used by `format`
const ZERO_CHUNK: usize = 64 * 1024;

impl Volume {
    /// Erase every file and zero the data region
    pub fn format(&mut self) -> Result<()> {
        let result = self.format_image();
        self.record(OpKind::Format, None, result.is_ok());
        result
    }

    fn format_image(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.table, Table::new(self.layout.max_files()));
        self.commit_or_restore(previous)?;

        let zeros = vec![0u8; ZERO_CHUNK];
        let mut offset = self.layout.data_start();
        while offset < self.layout.data_end() {
            let len = (self.layout.data_end() - offset).min(ZERO_CHUNK as u64) as usize;
            self.image.write_at(offset, &zeros[..len])?;
            offset += len as u64;
        }
        self.image.sync()?;

        tracing::info!("Formatted {}", self.image.path().display());
        Ok(())
    }

    /// Copy the whole image verbatim to `target`, returning the byte count
    ///
    /// Fails with `Io` (`UnexpectedEof`) if fewer than the full image size
    /// could be copied, and with `InvalidArgument` if `target` is the image.
    pub fn backup(&mut self, target: &Path) -> Result<u64> {
        let subject = target.display().to_string();
        let result = self.backup_image(target);
        self.record(OpKind::Backup, Some(&subject), result.is_ok());
        result
    }

    fn backup_image(&mut self, target: &Path) -> Result<u64> {
        if is_same_file(target, self.image.path()) {
            return Err(FsError::InvalidArgument(format!(
                "cannot back up {} onto itself",
                target.display()
            )));
        }

        let mut out = BufWriter::new(File::create(target)?);
        let copied = self.image.copy_to(&mut out)?;

        let file = out
            .into_inner()
            .map_err(|e| FsError::Io(e.into_error()))?;
        file.sync_all()?;

        let expected = self.layout.total_size();
        if copied != expected {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("backup incomplete: {}/{} bytes copied", copied, expected),
            )));
        }

        tracing::info!("Backed up {} bytes to {}", copied, target.display());
        Ok(copied)
    }

    /// Replace the image with the contents of `source` and reload the table
    ///
    /// The source is read in full before the image is touched, so an
    /// unreadable source leaves the volume as it was. The image is forced
    /// back to the fixed size. Metadata that cannot be decoded degrades to an
    /// empty table (see `load_outcome`); any other inconsistency only shows
    /// up in a later `check`.
    pub fn restore(&mut self, source: &Path) -> Result<u64> {
        let subject = source.display().to_string();
        let result = self.restore_image(source);
        self.record(OpKind::Restore, Some(&subject), result.is_ok());
        result
    }

    fn restore_image(&mut self, source: &Path) -> Result<u64> {
        let mut data = Vec::new();
        File::open(source)?
            .take(self.layout.total_size())
            .read_to_end(&mut data)?;

        // Whatever landed on disk is authoritative from here on
        let replaced = self.image.replace_contents(&data);
        self.reload_table();
        replaced?;

        tracing::info!(
            "Restored {} bytes from {} ({} files)",
            data.len(),
            source.display(),
            self.table.len()
        );
        Ok(data.len() as u64)
    }

    fn reload_table(&mut self) {
        let (table, outcome) = metadata::load(&mut self.image, ImageState::Existing);
        self.table = table;
        self.load_outcome = outcome;
    }
}

/// Whether both paths resolve to the same existing file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
