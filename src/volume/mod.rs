//! Volume Module
//!
//! The storage engine that owns the image and the file table.
//!
//! ## Responsibilities
//! - Open the image and load (or initialize) the table
//! - File table operations (create/delete/rename/...)
//! - Content operations (write/append/read/truncate/copy)
//! - Compaction and integrity checking
//! - Record every public operation in the operation log
//!
//! ## Commit Discipline
//! Every mutation follows the same order:
//! 1. Snapshot the table
//! 2. Write data bytes to the image (if any)
//! 3. Apply the change to the in-memory table
//! 4. Commit the whole metadata block and fsync
//!
//! If the commit fails the snapshot is put back, so the in-memory table
//! matches the last metadata block that did land. Data written in step 2 is
//! unreferenced by that table and therefore harmless.

mod check;
mod compact;
mod content;
mod files;
mod maintenance;

pub use check::{check_table, IntegrityIssue, IntegrityReport};
pub use content::Comparison;

use std::path::Path;

use parking_lot::Mutex;

use crate::allocator;
use crate::config::Config;
use crate::error::{FsError, Result};
use crate::image::Image;
use crate::layout::Layout;
use crate::metadata::{self, LoadOutcome};
use crate::oplog::{LogEntry, OpKind, OpLogReader, OpLogWriter, ReplayStats};
use crate::table::{Entry, Table};

/// Space usage summary derived from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeStats {
    /// Number of entries in the table
    pub file_count: usize,
    /// Bytes referenced by live entries
    pub used_bytes: u64,
    /// Unreferenced bytes in the data region
    pub free_bytes: u64,
    /// Largest contiguous free span
    pub largest_gap: u64,
    /// Number of free spans
    pub gap_count: usize,
}

/// A simulated storage volume backed by a single image file
///
/// ## Access Model
/// Single owner, synchronous. Mutations take `&mut self` and queries take
/// `&self`; the only interior mutability is the operation log, which
/// queries also append to.
pub struct Volume {
    /// Volume configuration
    config: Config,

    /// Image geometry (copied out of the config)
    layout: Layout,

    /// Open backing image
    image: Image,

    /// In-memory file table, committed after every mutation
    table: Table,

    /// What happened when the table was loaded
    load_outcome: LoadOutcome,

    /// Operation log (side channel, may be absent)
    log: Option<Mutex<OpLogWriter>>,
}

impl Volume {
    /// Open or create a volume with the given config
    ///
    /// On startup:
    /// 1. Open/create the image at the fixed size
    /// 2. Load the table (any metadata fault degrades to an empty table)
    /// 3. Open the operation log (a failure only disables logging)
    pub fn open(config: Config) -> Result<Self> {
        let layout = config.layout;

        // Step 1: Open the image (only failure mode that reaches the caller)
        let (mut image, state) = Image::open(&config.image_path, layout)?;

        // Step 2: Load or initialize the table
        let (table, load_outcome) = metadata::load(&mut image, state);
        tracing::info!(
            "Opened {} ({:?}, {} files)",
            config.image_path.display(),
            load_outcome,
            table.len()
        );

        // Step 3: Open the operation log
        let log = match &config.log_path {
            Some(path) => match OpLogWriter::open(path) {
                Ok(writer) => Some(Mutex::new(writer)),
                Err(e) => {
                    tracing::warn!("Operation log {} unavailable: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            config,
            layout,
            image,
            table,
            load_outcome,
            log,
        })
    }

    /// Open with an image path (convenience method)
    ///
    /// Uses the default layout and no operation log.
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().image_path(path).without_log().build();
        Self::open(config)
    }

    /// Close the volume, syncing the image
    pub fn close(mut self) -> Result<()> {
        self.image.sync()
    }

    // =========================================================================
    // Space Accounting
    // =========================================================================

    /// Summarize used and free space
    pub fn stats(&self) -> VolumeStats {
        let gaps = allocator::free_gaps(self.table.entries(), &self.layout);
        let free_bytes: u64 = gaps.iter().map(|g| g.len).sum();

        VolumeStats {
            file_count: self.table.len(),
            used_bytes: self.layout.data_size().saturating_sub(free_bytes),
            free_bytes,
            largest_gap: gaps.iter().map(|g| g.len).max().unwrap_or(0),
            gap_count: gaps.len(),
        }
    }

    // =========================================================================
    // Operation Log
    // =========================================================================

    /// Replay the operation log
    pub fn log_entries(&self) -> Result<(Vec<LogEntry>, ReplayStats)> {
        match &self.config.log_path {
            Some(path) if path.exists() => OpLogReader::replay(path),
            Some(_) => Ok((Vec::new(), ReplayStats::default())),
            None => Err(FsError::Config("operation log is disabled".to_string())),
        }
    }

    /// Record an operation outcome; failures are only reported
    fn record(&self, operation: OpKind, subject: Option<&str>, success: bool) {
        if let Some(log) = &self.log {
            if let Err(e) = log.lock().append(operation, subject, success) {
                tracing::warn!("Failed to record {} in operation log: {}", operation, e);
            }
        }
    }

    // =========================================================================
    // Commit Helpers
    // =========================================================================

    /// Commit the current table, restoring `previous` if the commit fails
    fn commit_or_restore(&mut self, previous: Table) -> Result<()> {
        if let Err(e) = metadata::commit(&mut self.image, &self.table) {
            tracing::warn!("Metadata commit failed, keeping previous table: {}", e);
            self.table = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Look up an entry or fail with `NotFound`
    fn entry_ref(&self, name: &str) -> Result<&Entry> {
        self.table
            .get(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut Entry> {
        self.table
            .get_mut(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Entries in table order
    pub fn entries(&self) -> &[Entry] {
        self.table.entries()
    }

    /// The in-memory table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Metadata entry for `name`, if present
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.table.get(name)
    }

    /// How the table was obtained at open (or at the last restore)
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Image geometry
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Backing image path
    pub fn image_path(&self) -> &Path {
        self.image.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
