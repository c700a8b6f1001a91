//! Grouped signed-delta aggregation for visualization
//!
//! Rolls per-key metric deltas between two snapshots up to a group label
//! (package or contributor). The signed accumulation is the primary policy;
//! the additions-only view is the same computation with negative deltas
//! filtered out. Keys without a resolvable label are excluded rather than
//! failing the whole aggregation.

use crate::snapshot::{Record, Snapshot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which metric column the aggregation rolls up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    LineCount,
    PackageCount,
    ModuleCount,
}

impl Metric {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "line_count" | "lines" => Ok(Self::LineCount),
            "package_count" | "packages" => Ok(Self::PackageCount),
            "module_count" | "modules" => Ok(Self::ModuleCount),
            _ => Err(format!(
                "Invalid metric: {}. Use 'line_count', 'package_count', or 'module_count'",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineCount => "line_count",
            Self::PackageCount => "package_count",
            Self::ModuleCount => "module_count",
        }
    }

    /// Metric value of one record. Every record counts 1 module.
    pub fn value(&self, record: &Record) -> u64 {
        match self {
            Self::LineCount => record.line_count,
            Self::PackageCount => record.package_count,
            Self::ModuleCount => 1,
        }
    }
}

/// Which attribute supplies the group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Package,
    Contributor,
}

impl GroupBy {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "package" => Ok(Self::Package),
            "contributor" => Ok(Self::Contributor),
            _ => Err(format!(
                "Invalid group-by attribute: {}. Use 'package' or 'contributor'",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Contributor => "contributor",
        }
    }
}

/// Aggregation configuration. `include_negative_deltas: false` restricts the
/// rollup to the additions-only view.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    pub metric: Metric,
    pub group_by: GroupBy,
    pub include_negative_deltas: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            metric: Metric::LineCount,
            group_by: GroupBy::Package,
            include_negative_deltas: true,
        }
    }
}

/// The contributor carrying the largest-magnitude share of a package's
/// delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantContributor {
    pub contributor: String,
    pub delta: i64,
}

/// Full aggregation output consumed by the presentation layer.
/// `dominant_contributors` is populated only when grouping by package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub metric: Metric,
    pub group_by: GroupBy,
    pub deltas: IndexMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_contributors: Option<IndexMap<String, DominantContributor>>,
}

/// Per-key accumulation over a snapshot's flat view. Duplicate keys are
/// tolerated by summing; the first non-empty package/contributor seen for a
/// key supplies its attribution.
#[derive(Debug, Default)]
struct KeyEntry {
    package: String,
    contributor: String,
    value: i64,
}

fn accumulate_by_key(snapshot: &Snapshot, metric: Metric) -> IndexMap<String, KeyEntry> {
    let mut by_key: IndexMap<String, KeyEntry> = IndexMap::new();

    for record in snapshot.rows() {
        if record.key.is_empty() {
            continue;
        }

        let entry = by_key.entry(record.key.clone()).or_default();
        entry.value += metric.value(record) as i64;
        if entry.package.is_empty() && !record.package.is_empty() {
            entry.package = record.package.clone();
        }
        if entry.contributor.is_empty() && !record.contributor.is_empty() {
            entry.contributor = record.contributor.clone();
        }
    }

    by_key
}

/// Roll up per-key deltas (`new − old`, old defaulting to 0) into a
/// label → signed delta mapping. Keys with an empty label are excluded;
/// everything else always aggregates. The mapping is insertion-ordered but
/// semantically unordered — consumers impose their own sort.
pub fn aggregate_deltas(
    old: &Snapshot,
    new: &Snapshot,
    options: &AggregateOptions,
) -> IndexMap<String, i64> {
    let old_by_key = accumulate_by_key(old, options.metric);
    let new_by_key = accumulate_by_key(new, options.metric);

    let mut grouped: IndexMap<String, i64> = IndexMap::new();

    for (key, entry) in &new_by_key {
        let label = match options.group_by {
            GroupBy::Package => entry.package.as_str(),
            GroupBy::Contributor => entry.contributor.as_str(),
        };
        if label.is_empty() {
            continue;
        }

        let old_value = old_by_key.get(key).map_or(0, |e| e.value);
        let delta = entry.value - old_value;
        if !options.include_negative_deltas && delta <= 0 {
            continue;
        }

        *grouped.entry(label.to_string()).or_insert(0) += delta;
    }

    grouped
}

/// Per-package, the contributor with the largest-magnitude delta share.
///
/// A nested accumulation keyed by (package, contributor), reduced with a
/// strict `>` magnitude comparison — ties keep the first-seen contributor.
/// That tie-break is deliberate: repeated runs must name the same
/// contributor. Keys without both a package and a contributor are excluded.
pub fn dominant_contributors(
    old: &Snapshot,
    new: &Snapshot,
    metric: Metric,
) -> IndexMap<String, DominantContributor> {
    let old_by_key = accumulate_by_key(old, metric);
    let new_by_key = accumulate_by_key(new, metric);

    let mut shares: IndexMap<String, IndexMap<String, i64>> = IndexMap::new();

    for (key, entry) in &new_by_key {
        if entry.package.is_empty() || entry.contributor.is_empty() {
            continue;
        }

        let old_value = old_by_key.get(key).map_or(0, |e| e.value);
        let delta = entry.value - old_value;

        *shares
            .entry(entry.package.clone())
            .or_default()
            .entry(entry.contributor.clone())
            .or_insert(0) += delta;
    }

    shares
        .into_iter()
        .filter_map(|(package, by_contributor)| {
            let mut best: Option<(String, i64)> = None;
            for (contributor, delta) in by_contributor {
                let wins = match &best {
                    None => true,
                    Some((_, best_delta)) => delta.unsigned_abs() > best_delta.unsigned_abs(),
                };
                if wins {
                    best = Some((contributor, delta));
                }
            }
            best.map(|(contributor, delta)| {
                (package, DominantContributor { contributor, delta })
            })
        })
        .collect()
}

/// Aggregate and, when grouping by package, attach dominant contributors.
pub fn build_report(old: &Snapshot, new: &Snapshot, options: &AggregateOptions) -> AggregateReport {
    let deltas = aggregate_deltas(old, new, options);
    let dominant = match options.group_by {
        GroupBy::Package => Some(dominant_contributors(old, new, options.metric)),
        GroupBy::Contributor => None,
    };

    AggregateReport {
        metric: options.metric,
        group_by: options.group_by,
        deltas,
        dominant_contributors: dominant,
    }
}
