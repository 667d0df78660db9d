//! # simfs
//!
//! A single-image simulated storage volume with:
//! - A flat table of named files persisted in a fixed-size metadata block
//! - First-fit byte-range allocation over derived free gaps
//! - In-place and relocating writes, append-in-place
//! - Compaction (defragmentation) and integrity checking
//! - Whole-image backup/restore and an append-only operation log
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CLI / collaborators                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Volume                             │
//! │   files · content · compact · check · maintenance           │
//! └──────┬──────────────┬──────────────────┬────────────────────┘
//!        │              │                  │
//!        ▼              ▼                  ▼
//!  ┌───────────┐  ┌───────────┐     ┌─────────────┐
//!  │ Allocator │  │ Metadata  │     │ Op Log      │
//!  │ (1st fit) │  │ (codec)   │     │ (side chan) │
//!  └─────┬─────┘  └─────┬─────┘     └─────────────┘
//!        │              │
//!        ▼              ▼
//!  ┌───────────────────────────────┐
//!  │ Image: [metadata][data ....]  │
//!  └───────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod layout;

pub mod table;
pub mod image;
pub mod metadata;
pub mod allocator;
pub mod oplog;
pub mod volume;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FsError, Result};
pub use config::Config;
pub use layout::Layout;
pub use table::{Entry, Table};
pub use volume::{Comparison, IntegrityIssue, IntegrityReport, Volume, VolumeStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of simfs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
