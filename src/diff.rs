//! Snapshot diff engine: status classification and signed deltas
//!
//! Comparison is a pure function of the two keyed views. Absent values
//! default to 0, so every key ever seen yields a diff row.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Classification of one key across two snapshots.
///
/// Variant order is the output sort priority: churn surfaces first,
/// unchanged rows sink to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Presentation labels for the four statuses. Localized output substitutes
/// its own set; the engine itself always classifies with [`DiffStatus`].
#[derive(Debug, Clone)]
pub struct StatusLabels {
    pub added: String,
    pub modified: String,
    pub deleted: String,
    pub unchanged: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self {
            added: "added".to_string(),
            modified: "modified".to_string(),
            deleted: "deleted".to_string(),
            unchanged: "unchanged".to_string(),
        }
    }
}

impl StatusLabels {
    pub fn label(&self, status: DiffStatus) -> &str {
        match status {
            DiffStatus::Added => &self.added,
            DiffStatus::Modified => &self.modified,
            DiffStatus::Deleted => &self.deleted,
            DiffStatus::Unchanged => &self.unchanged,
        }
    }
}

/// Per-key comparison result between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub key: String,
    pub status: DiffStatus,
    pub line_count_diff: i64,
    pub package_count_diff: i64,
    pub old_line_count: u64,
    pub old_package_count: u64,
    pub new_line_count: u64,
    pub new_package_count: u64,
}

/// Column order of the serialized diff table.
pub const DIFF_TABLE_HEADER: [&str; 8] = [
    "name",
    "status",
    "line_count_diff",
    "package_count_diff",
    "csv1_line_count",
    "csv1_package_count",
    "csv2_line_count",
    "csv2_package_count",
];

/// Compare two snapshots key by key.
///
/// Output order is held invariant across runs: status priority first
/// (added, modified, deleted, unchanged), key ascending as tie-break.
pub fn compare(old: &Snapshot, new: &Snapshot) -> Vec<DiffRow> {
    let keys: BTreeSet<&str> = old.keys().chain(new.keys()).collect();

    let mut rows: Vec<DiffRow> = keys
        .into_iter()
        .map(|key| classify(key, old, new))
        .collect();

    rows.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| a.key.cmp(&b.key)));
    rows
}

fn classify(key: &str, old: &Snapshot, new: &Snapshot) -> DiffRow {
    let old_record = old.get(key);
    let new_record = new.get(key);

    let old_line = old_record.map_or(0, |r| r.line_count);
    let old_package = old_record.map_or(0, |r| r.package_count);
    let new_line = new_record.map_or(0, |r| r.line_count);
    let new_package = new_record.map_or(0, |r| r.package_count);

    let line_count_diff = new_line as i64 - old_line as i64;
    let package_count_diff = new_package as i64 - old_package as i64;

    let status = match (old_record, new_record) {
        (None, Some(_)) => DiffStatus::Added,
        (Some(_), None) => DiffStatus::Deleted,
        _ => {
            if line_count_diff == 0 && package_count_diff == 0 {
                DiffStatus::Unchanged
            } else {
                DiffStatus::Modified
            }
        }
    };

    DiffRow {
        key: key.to_string(),
        status,
        line_count_diff,
        package_count_diff,
        old_line_count: old_line,
        old_package_count: old_package,
        new_line_count: new_line,
        new_package_count: new_package,
    }
}

/// Render diff rows as a table ready for CSV serialization, header first.
pub fn diff_table(rows: &[DiffRow], labels: &StatusLabels) -> Vec<Vec<String>> {
    let mut table = Vec::with_capacity(rows.len() + 1);
    table.push(DIFF_TABLE_HEADER.iter().map(|s| s.to_string()).collect());

    for row in rows {
        table.push(vec![
            row.key.clone(),
            labels.label(row.status).to_string(),
            row.line_count_diff.to_string(),
            row.package_count_diff.to_string(),
            row.old_line_count.to_string(),
            row.old_package_count.to_string(),
            row.new_line_count.to_string(),
            row.new_package_count.to_string(),
        ]);
    }

    table
}

/// Status counts over a diff result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_rows(rows: &[DiffRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.status {
                DiffStatus::Added => acc.added += 1,
                DiffStatus::Modified => acc.modified += 1,
                DiffStatus::Deleted => acc.deleted += 1,
                DiffStatus::Unchanged => acc.unchanged += 1,
            }
            acc
        })
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.modified > 0 || self.deleted > 0
    }

    pub fn total(&self) -> usize {
        self.added + self.modified + self.deleted + self.unchanged
    }
}
