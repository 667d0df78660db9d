//! Metadata Store
//!
//! Loads the table from the image at startup and commits it after every
//! mutation.

use crate::error::Result;
use crate::image::{Image, ImageState};
use crate::table::Table;

use super::{decode_table, encode_table};

/// How the table was obtained when the volume was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Table decoded from an existing image
    Loaded,

    /// Fresh image created with an empty table
    Created,

    /// Image had the wrong size; it was resized and reset to empty
    Resized { found: u64 },

    /// Metadata block was unreadable or corrupt; reset to empty
    Reset { reason: String },
}

/// Load the table for an image in the given state
///
/// Never fails: every fault degrades to an empty table, reported through
/// the returned `LoadOutcome`.
pub fn load(image: &mut Image, state: ImageState) -> (Table, LoadOutcome) {
    let layout = *image.layout();
    let empty = Table::new(layout.max_files());

    let outcome = match state {
        ImageState::Created => LoadOutcome::Created,
        ImageState::Resized { found } => {
            tracing::warn!(
                "Image {} has size {} (expected {}), resetting",
                image.path().display(),
                found,
                layout.total_size()
            );
            LoadOutcome::Resized { found }
        }
        ImageState::Existing => match read_table(image) {
            Ok(table) => return (table, LoadOutcome::Loaded),
            Err(e) => {
                tracing::warn!(
                    "Metadata of {} could not be loaded, starting empty: {}",
                    image.path().display(),
                    e
                );
                LoadOutcome::Reset {
                    reason: e.to_string(),
                }
            }
        },
    };

    if let Err(e) = commit(image, &empty) {
        tracing::warn!("Failed to write empty metadata block: {}", e);
    }

    (empty, outcome)
}

/// Read and decode the metadata block
fn read_table(image: &Image) -> Result<Table> {
    let layout = *image.layout();
    let mut block = vec![0u8; layout.meta_size() as usize];
    image.read_at(0, &mut block)?;
    decode_table(&block, layout.max_files())
}

/// Write the whole table as one zero-padded block at offset 0 and fsync
pub fn commit(image: &mut Image, table: &Table) -> Result<()> {
    let block = encode_table(table, image.layout().meta_size() as usize)?;
    image.write_at(0, &block)?;
    image.sync()
}
