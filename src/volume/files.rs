//! File Table Operations
//!
//! Create, delete, rename and metadata queries.

use crate::error::{FsError, Result};
use crate::oplog::OpKind;
use crate::table::{validate_name, Entry};

use super::Volume;

impl Volume {
    /// Create an empty file
    ///
    /// Errors: `InvalidName`, `AlreadyExists`, `CapacityExceeded`, or `Io`
    /// when the metadata commit fails (the new entry is dropped again).
    pub fn create(&mut self, name: &str) -> Result<()> {
        let result = self.create_entry(name);
        self.record(OpKind::Create, Some(name), result.is_ok());
        result
    }

    pub(super) fn create_entry(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.table.contains(name) {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        if self.table.is_full() {
            return Err(FsError::CapacityExceeded {
                max: self.table.capacity(),
            });
        }

        let previous = self.table.clone();
        self.table.push(Entry::new(name))?;
        self.commit_or_restore(previous)?;

        tracing::debug!("Created '{}'", name);
        Ok(())
    }

    /// Delete a file. Its bytes stay on disk, unreferenced.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let result = self.delete_entry(name);
        self.record(OpKind::Delete, Some(name), result.is_ok());
        result
    }

    pub(super) fn delete_entry(&mut self, name: &str) -> Result<()> {
        let previous = self.table.clone();
        self.table
            .remove(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        self.commit_or_restore(previous)?;

        tracing::debug!("Deleted '{}'", name);
        Ok(())
    }

    /// Rename a file in place (its table position is kept)
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let result = self.rename_entry(old, new);
        self.record(OpKind::Rename, Some(old), result.is_ok());
        result
    }

    fn rename_entry(&mut self, old: &str, new: &str) -> Result<()> {
        validate_name(new)?;
        if !self.table.contains(old) {
            return Err(FsError::NotFound(old.to_string()));
        }
        if self.table.contains(new) {
            return Err(FsError::AlreadyExists(new.to_string()));
        }

        let previous = self.table.clone();
        self.entry_mut(old)?.name = new.to_string();
        self.commit_or_restore(previous)?;

        tracing::debug!("Renamed '{}' -> '{}'", old, new);
        Ok(())
    }

    /// Move a file; without directories this is a rename that refuses paths
    pub fn mv(&mut self, src: &str, dest: &str) -> Result<()> {
        let result = if dest.contains('/') {
            Err(FsError::InvalidName(format!(
                "'{}': directories are not supported",
                dest
            )))
        } else {
            self.rename_entry(src, dest)
        };
        self.record(OpKind::Move, Some(src), result.is_ok());
        result
    }

    /// Whether a file named `name` exists
    pub fn exists(&self, name: &str) -> bool {
        let exists = self.table.contains(name);
        self.record(OpKind::Exists, Some(name), exists);
        exists
    }

    /// Logical size of a file in bytes
    pub fn size(&self, name: &str) -> Result<u64> {
        let result = self.entry_ref(name).map(|e| e.size);
        self.record(OpKind::Size, Some(name), result.is_ok());
        result
    }

    /// Snapshot of all entries in table order
    pub fn list(&self) -> Vec<Entry> {
        self.record(OpKind::List, None, true);
        self.table.entries().to_vec()
    }
}
