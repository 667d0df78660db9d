//! Metadata Codec
//!
//! Converts a `Table` to and from the metadata block bytes.

use crate::error::{FsError, Result};
use crate::table::{Entry, Table};

use super::{
    encoded_len, CREATED_FIELD, FOOTER_SIZE, HEADER_SIZE, MAGIC, NAME_FIELD, RECORD_SIZE,
    UNALLOCATED, VERSION,
};

// =============================================================================
// Encoding
// =============================================================================

/// Encode a table into a zero-padded block of exactly `block_size` bytes
pub fn encode_table(table: &Table, block_size: usize) -> Result<Vec<u8>> {
    let body_len = encoded_len(table.len());
    if body_len > block_size {
        return Err(FsError::Corruption(format!(
            "table of {} entries needs {} bytes, metadata block has {}",
            table.len(),
            body_len,
            block_size
        )));
    }

    let mut block = Vec::with_capacity(block_size);

    // Header
    block.extend_from_slice(MAGIC);
    block.extend_from_slice(&VERSION.to_le_bytes());
    block.extend_from_slice(&(table.len() as u32).to_le_bytes());

    // Records
    for entry in table.iter() {
        encode_entry(&mut block, entry)?;
    }

    // Footer
    let crc = crc32fast::hash(&block);
    block.extend_from_slice(&crc.to_le_bytes());

    block.resize(block_size, 0);
    Ok(block)
}

/// Append one fixed-width record
fn encode_entry(block: &mut Vec<u8>, entry: &Entry) -> Result<()> {
    block.extend_from_slice(&fixed_field::<NAME_FIELD>(&entry.name));

    let size = u32::try_from(entry.size).map_err(|_| {
        FsError::Corruption(format!("size of '{}' exceeds 32 bits", entry.name))
    })?;
    let start = match entry.start {
        Some(start) => u32::try_from(start)
            .ok()
            .filter(|&s| s != UNALLOCATED)
            .ok_or_else(|| {
                FsError::Corruption(format!("start of '{}' exceeds 32 bits", entry.name))
            })?,
        None => UNALLOCATED,
    };

    block.extend_from_slice(&size.to_le_bytes());
    block.extend_from_slice(&start.to_le_bytes());
    block.extend_from_slice(&fixed_field::<CREATED_FIELD>(&entry.created));
    Ok(())
}

/// NUL-padded copy of `s`, cut so the last byte stays NUL
fn fixed_field<const N: usize>(s: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let len = s.len().min(N - 1);
    field[..len].copy_from_slice(&s.as_bytes()[..len]);
    field
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a table from a metadata block
///
/// Structural damage (magic, version, length, CRC, encoding) is an error.
/// Semantic problems such as duplicate names or overlapping ranges are
/// decoded as-is.
pub fn decode_table(block: &[u8], capacity: usize) -> Result<Table> {
    if block.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(FsError::Corruption(format!(
            "metadata block too short: {} bytes",
            block.len()
        )));
    }

    if &block[0..4] != MAGIC {
        return Err(FsError::Corruption(format!(
            "invalid metadata magic: expected SFS1, got {:?}",
            &block[0..4]
        )));
    }

    let version = u16::from_le_bytes([block[4], block[5]]);
    if version != VERSION {
        return Err(FsError::Corruption(format!(
            "unsupported metadata version: {}",
            version
        )));
    }

    let count = read_u32(block, 6) as usize;
    let body_len = HEADER_SIZE
        .checked_add(count.saturating_mul(RECORD_SIZE))
        .filter(|&len| len + FOOTER_SIZE <= block.len())
        .ok_or_else(|| {
            FsError::Corruption(format!("entry count {} does not fit the block", count))
        })?;

    let stored_crc = read_u32(block, body_len);
    let computed_crc = crc32fast::hash(&block[..body_len]);
    if stored_crc != computed_crc {
        return Err(FsError::Corruption(format!(
            "metadata CRC mismatch: stored {:#010x}, computed {:#010x}",
            stored_crc, computed_crc
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let offset = HEADER_SIZE + i * RECORD_SIZE;
        entries.push(decode_entry(&block[offset..offset + RECORD_SIZE])?);
    }

    Ok(Table::from_entries(entries, capacity))
}

fn decode_entry(record: &[u8]) -> Result<Entry> {
    let name = field_str(&record[..NAME_FIELD], "name")?;
    let size = read_u32(record, NAME_FIELD) as u64;
    let start = match read_u32(record, NAME_FIELD + 4) {
        UNALLOCATED => None,
        start => Some(start as u64),
    };
    let created = field_str(&record[NAME_FIELD + 8..], "created")?;

    Ok(Entry {
        name,
        size,
        start,
        created,
    })
}

/// Read a NUL-terminated UTF-8 string out of a fixed field
fn field_str(field: &[u8], what: &str) -> Result<String> {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8(field[..len].to_vec())
        .map_err(|_| FsError::Corruption(format!("{} field is not valid UTF-8", what)))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
