//! Snapshot source resolution, caching, and the totals timeline
//!
//! A data directory holds one inventory snapshot per date, either as a flat
//! `YYYY-MM-DD.csv` file or as a `YYYY-MM-DD/summary.csv` subdirectory.
//! Discovery recognizes both layouts. Built snapshots are held in an
//! explicit [`SnapshotCache`] owned by the caller — the engines themselves
//! stay cache-free.

use crate::error::{MetricdiffError, Result};
use crate::snapshot::{ColumnSpec, Snapshot, Totals};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One dated snapshot source discovered in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSnapshot {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Resolves a data directory to its dated snapshot sources.
#[derive(Debug, Clone)]
pub struct SnapshotResolver {
    data_dir: PathBuf,
}

impl SnapshotResolver {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(MetricdiffError::data_dir_not_found(data_dir));
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Find every dated snapshot source, date ascending. When one date
    /// appears in both layouts the entry found last wins.
    pub fn discover(&self) -> Result<Vec<DatedSnapshot>> {
        let mut by_date: BTreeMap<NaiveDate, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(&self.data_dir)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let date = match entry.depth() {
                // data/<date>.csv
                1 => {
                    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                        continue;
                    }
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(|stem| NaiveDate::parse_from_str(stem, DATE_FORMAT).ok())
                }
                // data/<date>/summary.csv
                2 => {
                    if entry.file_name() != "summary.csv" {
                        continue;
                    }
                    path.parent()
                        .and_then(|p| p.file_name())
                        .and_then(|s| s.to_str())
                        .and_then(|dir| NaiveDate::parse_from_str(dir, DATE_FORMAT).ok())
                }
                _ => None,
            };

            if let Some(date) = date {
                by_date.insert(date, path.to_path_buf());
            }
        }

        log::debug!(
            "Discovered {} dated snapshots in {}",
            by_date.len(),
            self.data_dir.display()
        );

        Ok(by_date
            .into_iter()
            .map(|(date, path)| DatedSnapshot { date, path })
            .collect())
    }
}

/// Read and build one snapshot. A missing or unreadable file is fatal;
/// malformed content inside the file is not.
pub fn load_snapshot(path: &Path, spec: &ColumnSpec) -> Result<Snapshot> {
    let text = fs::read_to_string(path).map_err(|e| {
        MetricdiffError::invalid_input(format!(
            "Failed to read snapshot '{}': {}",
            path.display(),
            e
        ))
    })?;

    let snapshot = Snapshot::from_csv_text(&text, spec);
    log::debug!("Loaded {} rows from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

/// Explicit snapshot cache, owned and passed by the caller.
///
/// One entry per source path. [`SnapshotCache::reload`] overwrites the
/// entry — that is the whole invalidation rule.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<PathBuf, Snapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path, spec: &ColumnSpec) -> Result<&Snapshot> {
        if !self.entries.contains_key(path) {
            let snapshot = load_snapshot(path, spec)?;
            self.entries.insert(path.to_path_buf(), snapshot);
        }
        Ok(&self.entries[path])
    }

    /// Re-read the source and overwrite the cache entry.
    pub fn reload(&mut self, path: &Path, spec: &ColumnSpec) -> Result<&Snapshot> {
        let snapshot = load_snapshot(path, spec)?;
        self.entries.insert(path.to_path_buf(), snapshot);
        Ok(&self.entries[path])
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Load every source not yet cached, in parallel. Sources are
    /// independent immutable inputs, so this is safe fan-out.
    pub fn load_many(&mut self, sources: &[DatedSnapshot], spec: &ColumnSpec) -> Result<()> {
        let missing: Vec<&DatedSnapshot> = sources
            .iter()
            .filter(|source| !self.entries.contains_key(&source.path))
            .collect();

        let loaded: Vec<(PathBuf, Snapshot)> = missing
            .par_iter()
            .map(|source| {
                load_snapshot(&source.path, spec).map(|snapshot| (source.path.clone(), snapshot))
            })
            .collect::<Result<Vec<_>>>()?;

        for (path, snapshot) in loaded {
            self.entries.insert(path, snapshot);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whole-snapshot totals at one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Per-date totals across a set of dated sources, date ascending.
pub fn build_timeline(
    sources: &[DatedSnapshot],
    cache: &mut SnapshotCache,
    spec: &ColumnSpec,
) -> Result<Vec<TimelinePoint>> {
    cache.load_many(sources, spec)?;

    sources
        .iter()
        .map(|source| {
            let snapshot = cache.get_or_load(&source.path, spec)?;
            Ok(TimelinePoint {
                date: source.date,
                totals: snapshot.totals(),
            })
        })
        .collect()
}
