//! Allocator
//!
//! First-fit byte-range allocation over the data region.
//!
//! There is no free list. Free space is derived from the table on every
//! request: the live ranges are sorted by start and the holes between them
//! (plus the head and tail of the data region) are the gaps. This stays
//! cheap only while the table capacity is small.
//!
//! First-fit favours low offsets, so repeated writes fragment the tail of
//! the region; `Volume::defragment` packs everything back together.

use crate::layout::Layout;
use crate::table::Entry;

/// A contiguous unallocated range in the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    /// Absolute offset of the first free byte
    pub start: u64,
    /// Length in bytes
    pub len: u64,
}

/// `[start, end)` of every live entry, sorted by start
pub fn live_segments(entries: &[Entry]) -> Vec<(u64, u64)> {
    let mut segments: Vec<(u64, u64)> = entries.iter().filter_map(Entry::range).collect();
    segments.sort_by_key(|&(start, _)| start);
    segments
}

/// Free gaps in ascending offset order
///
/// An empty table yields the whole data region as a single gap.
pub fn free_gaps(entries: &[Entry], layout: &Layout) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut cursor = layout.data_start();

    for (start, end) in live_segments(entries) {
        if start > cursor {
            gaps.push(Gap {
                start: cursor,
                len: start - cursor,
            });
        }
        cursor = cursor.max(end);
    }

    if layout.data_end() > cursor {
        gaps.push(Gap {
            start: cursor,
            len: layout.data_end() - cursor,
        });
    }

    gaps
}

/// First gap (lowest offset) that can hold `requested` bytes
pub fn find_free_span(entries: &[Entry], layout: &Layout, requested: u64) -> Option<u64> {
    free_gaps(entries, layout)
        .into_iter()
        .find(|gap| gap.len >= requested)
        .map(|gap| gap.start)
}

/// Start of the nearest live entry beginning after `start`, or the end of
/// the data region. This is how far an entry at `start` can grow in place.
pub fn next_start_after(entries: &[Entry], layout: &Layout, start: u64) -> u64 {
    entries
        .iter()
        .filter_map(Entry::range)
        .map(|(s, _)| s)
        .filter(|&s| s > start)
        .min()
        .unwrap_or(layout.data_end())
}
