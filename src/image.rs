//! Backing Image
//!
//! Raw positioned I/O over the fixed-size image file.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::Layout;

/// What `Image::open` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// No image existed; a new one was created at the fixed size
    Created,

    /// The image had the wrong size and was forced to the fixed size
    Resized { found: u64 },

    /// The image exists with the expected size
    Existing,
}

/// Open handle to the backing image file
#[derive(Debug)]
pub struct Image {
    file: File,
    path: PathBuf,
    layout: Layout,
}

impl Image {
    /// Open the image, creating or resizing it to the layout's total size
    pub fn open(path: &Path, layout: Layout) -> Result<(Self, ImageState)> {
        let existed = path.exists();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let found = file.metadata()?.len();
        let state = if !existed {
            ImageState::Created
        } else if found != layout.total_size() {
            ImageState::Resized { found }
        } else {
            ImageState::Existing
        };

        if state != ImageState::Existing {
            file.set_len(layout.total_size())?;
        }

        Ok((
            Self {
                file,
                path: path.to_path_buf(),
                layout,
            },
            state,
        ))
    }

    /// Fill `buf` from the image at `offset`; a short read is an error
    ///
    /// Takes `&self`: `&File` implements `Read` and `Seek`, and every caller
    /// seeks before touching the cursor.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }

    /// Write all of `data` at `offset` (no fsync)
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;
        Ok(())
    }

    /// Force written data and metadata to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Copy the whole image into `out`, returning the byte count
    pub fn copy_to(&mut self, out: &mut impl Write) -> Result<u64> {
        self.file.seek(SeekFrom::Start(0))?;
        let copied = io::copy(&mut (&self.file).take(self.layout.total_size()), out)?;
        out.flush()?;
        Ok(copied)
    }

    /// Replace the whole image with `data`, zero-filled up to the fixed size
    ///
    /// Bytes past the total size are ignored. If any step fails the file is
    /// still forced back to the fixed size before the error is returned.
    pub fn replace_contents(&mut self, data: &[u8]) -> Result<()> {
        let result = self.rewrite(data);
        if result.is_err() {
            if let Err(e) = self.file.set_len(self.layout.total_size()) {
                tracing::warn!(
                    "Failed to restore size of {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
        result
    }

    fn rewrite(&mut self, data: &[u8]) -> Result<()> {
        let total = self.layout.total_size();
        let len = (data.len() as u64).min(total) as usize;

        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&data[..len])?;
        self.file.set_len(total)?;
        self.file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}
