//! Compaction
//!
//! Packs all live data to the front of the data region.

use crate::error::{FsError, Result};
use crate::oplog::OpKind;

use super::{check_table, Volume};

impl Volume {
    /// Defragment the data region
    ///
    /// Entries are reordered by ascending start (empty ones last), their
    /// bytes are copied back to back from the start of the data region and
    /// the starts are rebased. The new order is committed with the table.
    /// Running it twice in a row changes nothing the second time.
    ///
    /// A table that fails `check` is refused with `Corruption` before any
    /// byte is moved.
    ///
    /// Returns the number of entries whose start moved.
    pub fn defragment(&mut self) -> Result<usize> {
        let result = self.compact();
        self.record(OpKind::Defragment, None, result.is_ok());
        result
    }

    fn compact(&mut self) -> Result<usize> {
        if self.table.is_empty() {
            return Ok(0);
        }

        let report = check_table(&self.table, &self.layout);
        if !report.is_consistent() {
            return Err(FsError::Corruption(format!(
                "refusing to defragment a table with {} integrity issue(s); run check",
                report.issue_count()
            )));
        }

        let data_start = self.layout.data_start();
        let data_size = self.layout.data_size() as usize;

        let mut table = self.table.clone();
        table.sort_by_start();

        let mut current = vec![0u8; data_size];
        self.image.read_at(data_start, &mut current)?;

        // In bounds and disjoint (checked above), so the packed total fits
        let mut packed = vec![0u8; data_size];
        let mut cursor = 0usize;
        let mut moved = 0;

        for entry in table.entries_mut() {
            let Some((start, _)) = entry.range() else {
                continue;
            };

            let len = entry.size as usize;
            let from = (start - data_start) as usize;
            packed[cursor..cursor + len].copy_from_slice(&current[from..from + len]);

            let new_start = data_start + cursor as u64;
            if new_start != start {
                moved += 1;
            }
            entry.start = Some(new_start);
            cursor += len;
        }

        // Data first, then the table that points at it
        self.image.write_at(data_start, &packed)?;
        self.image.sync()?;

        let previous = std::mem::replace(&mut self.table, table);
        self.commit_or_restore(previous)?;

        tracing::info!(
            "Defragmented: {} entries moved, {} bytes packed",
            moved,
            cursor
        );
        Ok(moved)
    }
}
