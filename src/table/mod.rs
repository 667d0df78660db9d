//! File Table Module
//!
//! In-memory table of file entries.
//!
//! ## Responsibilities
//! - Keep entries in insertion order (rename keeps position, delete closes the hole)
//! - Bound the number of entries by the layout capacity
//! - Name validation and lookup
//!
//! ## Data Structure Choice
//! A plain `Vec<Entry>` with linear lookup:
//! - Capacity is small (64 by default)
//! - Order is part of the persisted state

mod entry;

pub use entry::{Entry, CREATED_FORMAT};

use crate::error::{FsError, Result};
use crate::layout::MAX_NAME_LEN;

/// Ordered, capacity-bounded collection of file entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    entries: Vec<Entry>,
    capacity: usize,
}

impl Table {
    /// Create an empty table
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a table from decoded entries without enforcing invariants.
    ///
    /// A table read back from an image may be inconsistent (over capacity,
    /// duplicate names, overlapping ranges); the integrity checker reports it.
    pub fn from_entries(entries: Vec<Entry>, capacity: usize) -> Self {
        Self { entries, capacity }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries in table order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Position of the entry named `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Append an entry at the end
    pub fn push(&mut self, entry: Entry) -> Result<()> {
        if self.is_full() {
            return Err(FsError::CapacityExceeded { max: self.capacity });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove an entry, keeping the relative order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx))
    }

    /// Reorder entries: live ones by ascending start, then the empty ones
    ///
    /// The sort is stable, so empty entries keep their relative order.
    pub fn sort_by_start(&mut self) {
        self.entries.sort_by_key(|e| match e.range() {
            Some((start, _)) => (false, start),
            None => (true, 0),
        });
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }
}

/// Validate a file name: 1..=31 bytes, no '/' and no NUL
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FsError::InvalidName("name cannot be empty".to_string()));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(FsError::InvalidName(format!(
            "'{}' is longer than {} bytes",
            name, MAX_NAME_LEN
        )));
    }

    if name.contains('/') {
        return Err(FsError::InvalidName(format!(
            "'{}' contains '/' (directories are not supported)",
            name
        )));
    }

    if name.contains('\0') {
        return Err(FsError::InvalidName(
            "name cannot contain NUL bytes".to_string(),
        ));
    }

    Ok(())
}
