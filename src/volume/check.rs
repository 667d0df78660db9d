//! Integrity Checker
//!
//! Validates the table against the layout without touching the image.

use std::fmt;

use crate::layout::Layout;
use crate::oplog::OpKind;
use crate::table::Table;

use super::Volume;

/// A single inconsistency found in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// More entries than the table capacity
    TooManyFiles { count: usize, max: usize },

    /// Two entries share a name (reported once per pair)
    DuplicateName { name: String },

    /// A live entry has no start or its range leaves the data region
    OutOfBounds {
        name: String,
        start: Option<u64>,
        size: u64,
    },

    /// Two live ranges overlap
    Overlap { first: String, second: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::TooManyFiles { count, max } => {
                write!(f, "file count {} exceeds maximum {}", count, max)
            }
            IntegrityIssue::DuplicateName { name } => {
                write!(f, "more than one file is named '{}'", name)
            }
            IntegrityIssue::OutOfBounds { name, start, size } => match start {
                Some(start) => write!(
                    f,
                    "'{}' range [{}, {}) is outside the data region",
                    name,
                    start,
                    start.saturating_add(*size)
                ),
                None => write!(f, "'{}' has {} bytes but no start offset", name, size),
            },
            IntegrityIssue::Overlap { first, second } => {
                write!(f, "data of '{}' and '{}' overlaps", first, second)
            }
        }
    }
}

/// Findings of an integrity check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Number of issues found
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check a table against a layout
///
/// Every rule is evaluated independently, so one bad entry can yield several
/// issues. The table itself is never modified.
pub fn check_table(table: &Table, layout: &Layout) -> IntegrityReport {
    let mut issues = Vec::new();
    let entries = table.entries();

    if entries.len() > layout.max_files() {
        issues.push(IntegrityIssue::TooManyFiles {
            count: entries.len(),
            max: layout.max_files(),
        });
    }

    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if a.name == b.name {
                issues.push(IntegrityIssue::DuplicateName {
                    name: a.name.clone(),
                });
            }
        }
    }

    for entry in entries.iter().filter(|e| e.size > 0) {
        let in_bounds = entry
            .start
            .map_or(false, |start| layout.contains_range(start, entry.size));
        if !in_bounds {
            issues.push(IntegrityIssue::OutOfBounds {
                name: entry.name.clone(),
                start: entry.start,
                size: entry.size,
            });
        }
    }

    // Sorted working copy; the table order is left alone
    let mut live: Vec<_> = entries
        .iter()
        .filter_map(|e| e.range().map(|(start, end)| (start, end, &e.name)))
        .collect();
    live.sort_by_key(|&(start, _, _)| start);

    for pair in live.windows(2) {
        let (_, end, first) = pair[0];
        let (next_start, _, second) = pair[1];
        if end > next_start {
            issues.push(IntegrityIssue::Overlap {
                first: first.clone(),
                second: second.clone(),
            });
        }
    }

    IntegrityReport { issues }
}

impl Volume {
    /// Check the in-memory table for inconsistencies
    pub fn check(&self) -> IntegrityReport {
        let report = check_table(&self.table, &self.layout);
        for issue in &report.issues {
            tracing::warn!("Integrity issue: {}", issue);
        }
        self.record(OpKind::Check, None, report.is_consistent());
        report
    }
}
