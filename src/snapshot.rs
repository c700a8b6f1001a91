//! Snapshot model: typed records, key derivation, numeric coercion
//!
//! A snapshot is built from one parsed table. Columns are found by header
//! name, not position; every logical attribute accepts an ordered list of
//! candidate header names and the first non-empty value wins. Missing
//! columns resolve to absent values, never to a parse failure.

use crate::csv;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered candidate header names for each logical attribute.
///
/// Inventories from different sources spell the same attribute differently
/// (`package` vs `pkg_name`); candidates are tried in order and the first
/// column with a non-empty value supplies the attribute.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: Vec<String>,
    pub identifier: Vec<String>,
    pub package: Vec<String>,
    pub contributor: Vec<String>,
    pub line_count: Vec<String>,
    pub package_count: Vec<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        fn names(candidates: &[&str]) -> Vec<String> {
            candidates.iter().map(|s| s.to_string()).collect()
        }

        Self {
            name: names(&["name"]),
            identifier: names(&["module", "file", "path", "name", "module_id"]),
            package: names(&["package", "pkg_name"]),
            contributor: names(&["contributor"]),
            line_count: names(&["line_count"]),
            package_count: names(&["package_count"]),
        }
    }
}

/// Header-resolved column indices for one table, per logical attribute.
#[derive(Debug, Default)]
struct ColumnLookup {
    name: Vec<usize>,
    identifier: Vec<usize>,
    package: Vec<usize>,
    contributor: Vec<usize>,
    line_count: Vec<usize>,
    package_count: Vec<usize>,
}

impl ColumnLookup {
    fn new(header: &[String], spec: &ColumnSpec) -> Self {
        fn indices(header: &[String], candidates: &[String]) -> Vec<usize> {
            candidates
                .iter()
                .filter_map(|candidate| header.iter().position(|col| col.trim() == candidate))
                .collect()
        }

        Self {
            name: indices(header, &spec.name),
            identifier: indices(header, &spec.identifier),
            package: indices(header, &spec.package),
            contributor: indices(header, &spec.contributor),
            line_count: indices(header, &spec.line_count),
            package_count: indices(header, &spec.package_count),
        }
    }

    /// First non-empty value among the attribute's candidate columns.
    fn resolve<'a>(indices: &[usize], row: &'a [String]) -> &'a str {
        for &idx in indices {
            if let Some(value) = row.get(idx) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return trimmed;
                }
            }
        }
        ""
    }
}

/// One tracked unit's metric values within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub package: String,
    pub contributor: String,
    pub line_count: u64,
    pub package_count: u64,
}

/// Whole-snapshot sums. `module_count` counts retained rows independent of
/// key validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub line_count: u64,
    pub package_count: u64,
    pub module_count: u64,
}

/// One point-in-time typed collection of records.
///
/// Exposes both a keyed view (unique keys, last write wins) and a flat view
/// (every retained row, in input order). The flat view feeds unkeyed
/// aggregates such as whole-snapshot totals; the keyed view feeds the diff
/// engine. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<Record>,
    keyed: IndexMap<String, usize>,
}

impl Snapshot {
    /// Build a snapshot from parsed rows. The first row is the header; data
    /// rows whose fields are all empty are skipped. Building never fails:
    /// unparseable counts coerce to 0 and missing attributes resolve to
    /// empty strings.
    pub fn build(rows: &[Vec<String>], spec: &ColumnSpec) -> Self {
        let Some((header, data)) = rows.split_first() else {
            return Self::default();
        };

        let lookup = ColumnLookup::new(header, spec);
        let mut records = Vec::with_capacity(data.len());
        let mut keyed = IndexMap::with_capacity(data.len());

        for row in data {
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let index = records.len();
            let record = Record {
                key: derive_key(&lookup, row, index),
                package: ColumnLookup::resolve(&lookup.package, row).to_string(),
                contributor: derive_contributor(&lookup, row),
                line_count: coerce_count(ColumnLookup::resolve(&lookup.line_count, row)),
                package_count: coerce_count(ColumnLookup::resolve(&lookup.package_count, row)),
            };

            // last write wins on duplicate keys; empty keys stay out of the
            // keyed view but remain in the flat view
            if !record.key.is_empty() {
                keyed.insert(record.key.clone(), index);
            }
            records.push(record);
        }

        Self { records, keyed }
    }

    /// Parse raw CSV text (default dialect) and build.
    pub fn from_csv_text(text: &str, spec: &ColumnSpec) -> Self {
        let rows = csv::parse(csv::normalize_input(text));
        Self::build(&rows, spec)
    }

    /// Flat view: every retained row in input order.
    pub fn rows(&self) -> &[Record] {
        &self.records
    }

    /// Keyed lookup. Duplicate keys resolve to the last row inserted.
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.keyed.get(key).map(|&idx| &self.records[idx])
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keyed.keys().map(|k| k.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keyed.contains_key(key)
    }

    /// Number of retained rows (flat view).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum metric values across the flat view.
    pub fn totals(&self) -> Totals {
        self.records.iter().fold(Totals::default(), |mut acc, record| {
            acc.line_count += record.line_count;
            acc.package_count += record.package_count;
            acc.module_count += 1;
            acc
        })
    }
}

/// Derive the key correlating a unit across snapshots. First match wins:
/// an explicit name; then `package::identifier` with the identifier drawn
/// from the candidate priority list (or `row-<index>` when none is found);
/// then the bare positional fallback. Positional keys keep every row
/// comparable within its own snapshot; cross-snapshot correlation for them
/// is best-effort only.
fn derive_key(lookup: &ColumnLookup, row: &[String], index: usize) -> String {
    let name = ColumnLookup::resolve(&lookup.name, row);
    if !name.is_empty() {
        return name.to_string();
    }

    let package = ColumnLookup::resolve(&lookup.package, row);
    if !package.is_empty() {
        let identifier = ColumnLookup::resolve(&lookup.identifier, row);
        if identifier.is_empty() {
            return format!("{}::row-{}", package, index);
        }
        return format!("{}::{}", package, identifier);
    }

    format!("row-{}", index)
}

/// An explicit contributor column wins; otherwise the owner segment of an
/// `owner/repo` shaped name; otherwise empty (attribution dropped).
fn derive_contributor(lookup: &ColumnLookup, row: &[String]) -> String {
    let direct = ColumnLookup::resolve(&lookup.contributor, row);
    if !direct.is_empty() {
        return direct.to_string();
    }

    let repo = ColumnLookup::resolve(&lookup.name, row);
    match repo.split_once('/') {
        Some((owner, _)) => owner.trim().to_string(),
        None => String::new(),
    }
}

/// Coerce a raw count to a non-negative integer. Non-numeric, non-finite,
/// and negative values all become 0; fractional parts truncate.
fn coerce_count(raw: &str) -> u64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value as u64,
        _ => 0,
    }
}
