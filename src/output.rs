//! Output formatting utilities

use crate::aggregate::AggregateReport;
use crate::diff::DiffSummary;
use crate::error::Result;
use crate::resolver::TimelinePoint;
use crate::snapshot::Totals;
use std::fs;
use std::path::Path;

/// UTF-8 byte-order mark. Spreadsheet tools use it to detect encoding, so
/// diff tables carry it by default.
pub const BOM: &str = "\u{feff}";

/// Write text to a file, optionally BOM-prefixed, creating parent
/// directories as needed.
pub fn write_output(path: &Path, content: &str, with_bom: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if with_bom {
        fs::write(path, format!("{}{}", BOM, content))?;
    } else {
        fs::write(path, content)?;
    }
    Ok(())
}

/// Render a signed delta with an explicit `+` on gains.
fn format_signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

/// Pretty printer for metricdiff output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print diff status counts
    pub fn print_diff_summary(summary: &DiffSummary) {
        println!("🔍 Diff Summary ({} keys)", summary.total());
        println!("├─ Added: {}", summary.added);
        println!("├─ Modified: {}", summary.modified);
        println!("├─ Deleted: {}", summary.deleted);
        println!("└─ Unchanged: {}", summary.unchanged);
    }

    /// Print whole-snapshot totals
    pub fn print_totals(totals: &Totals) {
        println!("📊 Snapshot Totals");
        println!("├─ line_count: {}", totals.line_count);
        println!("├─ package_count: {}", totals.package_count);
        println!("└─ module_count: {}", totals.module_count);
    }

    /// Print grouped deltas, largest magnitude first, plus dominant
    /// contributors when present.
    pub fn print_aggregate_report(report: &AggregateReport) {
        println!(
            "📈 {} delta by {}",
            report.metric.as_str(),
            report.group_by.as_str()
        );

        if report.deltas.is_empty() {
            println!("└─ No grouped deltas.");
            return;
        }

        let mut entries: Vec<(&String, &i64)> = report.deltas.iter().collect();
        entries.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()));

        for (i, (label, delta)) in entries.iter().enumerate() {
            let prefix = if i == entries.len() - 1 { "└─" } else { "├─" };
            println!("{} {}: {}", prefix, label, format_signed(**delta));
        }

        if let Some(dominant) = &report.dominant_contributors {
            if !dominant.is_empty() {
                println!("👤 Dominant contributor per package");
                for (i, (package, share)) in dominant.iter().enumerate() {
                    let prefix = if i == dominant.len() - 1 { "└─" } else { "├─" };
                    println!(
                        "{} {}: {} ({})",
                        prefix,
                        package,
                        share.contributor,
                        format_signed(share.delta)
                    );
                }
            }
        }
    }

    /// Print the per-date totals series
    pub fn print_timeline(points: &[TimelinePoint]) {
        if points.is_empty() {
            println!("No dated snapshots found.");
            return;
        }

        println!("📅 Totals Timeline ({} dates)", points.len());
        for (i, point) in points.iter().enumerate() {
            let prefix = if i == points.len() - 1 { "└─" } else { "├─" };
            println!(
                "{} {}: line_count={}, package_count={}, module_count={}",
                prefix,
                point.date,
                point.totals.line_count,
                point.totals.package_count,
                point.totals.module_count
            );
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}
