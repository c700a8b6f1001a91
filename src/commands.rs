//! Command implementations for metricdiff CLI

use crate::aggregate::{self, AggregateOptions, GroupBy, Metric};
use crate::cli::{Commands, OutputFormat};
use crate::csv;
use crate::diff::{self, DiffSummary, StatusLabels};
use crate::error::{MetricdiffError, Result};
use crate::output::{write_output, JsonFormatter, PrettyPrinter};
use crate::resolver::{build_timeline, SnapshotCache, SnapshotResolver};
use crate::snapshot::{ColumnSpec, Snapshot};
use std::fs;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Diff {
            csv1,
            csv2,
            output,
            no_bom,
        } => diff_command(&csv1, &csv2, &output, no_bom),
        Commands::Aggregate {
            csv1,
            csv2,
            metric,
            group_by,
            positive_only,
            format,
            output,
        } => aggregate_command(
            &csv1,
            &csv2,
            &metric,
            &group_by,
            positive_only,
            &format,
            output.as_deref(),
        ),
        Commands::Totals { input, format } => totals_command(&input, &format),
        Commands::Timeline {
            data_dir,
            format,
            output,
        } => timeline_command(&data_dir, &format, output.as_deref()),
    }
}

/// Read one snapshot file. Unreadable inputs are the fatal case; anything
/// inside the file is handled by coercion.
fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        MetricdiffError::invalid_input(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// Load both snapshots of a comparison. The inputs are independent, so the
/// two parses run concurrently.
fn load_pair(csv1: &Path, csv2: &Path, spec: &ColumnSpec) -> Result<(Snapshot, Snapshot)> {
    let text1 = read_input(csv1)?;
    let text2 = read_input(csv2)?;

    let (old, new) = rayon::join(
        || Snapshot::from_csv_text(&text1, spec),
        || Snapshot::from_csv_text(&text2, spec),
    );

    log::info!(
        "Loaded snapshots: {} rows from {}, {} rows from {}",
        old.len(),
        csv1.display(),
        new.len(),
        csv2.display()
    );

    Ok((old, new))
}

/// Compare two snapshot files and write the diff table
fn diff_command(csv1: &Path, csv2: &Path, output: &Path, no_bom: bool) -> Result<()> {
    let spec = ColumnSpec::default();
    let (old, new) = load_pair(csv1, csv2, &spec)?;

    let rows = diff::compare(&old, &new);
    let table = diff::diff_table(&rows, &StatusLabels::default());
    write_output(output, &csv::serialize(&table), !no_bom)?;

    PrettyPrinter::print_diff_summary(&DiffSummary::from_rows(&rows));
    println!("💾 Diff saved to: {}", output.display());

    Ok(())
}

/// Aggregate grouped metric deltas between two snapshot files
fn aggregate_command(
    csv1: &Path,
    csv2: &Path,
    metric: &str,
    group_by: &str,
    positive_only: bool,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let metric = Metric::parse(metric).map_err(MetricdiffError::invalid_input)?;
    let group_by = GroupBy::parse(group_by).map_err(MetricdiffError::invalid_input)?;
    let output_format = OutputFormat::parse(format).map_err(MetricdiffError::invalid_input)?;

    let options = AggregateOptions {
        metric,
        group_by,
        include_negative_deltas: !positive_only,
    };

    let spec = ColumnSpec::default();
    let (old, new) = load_pair(csv1, csv2, &spec)?;
    let report = aggregate::build_report(&old, &new, &options);

    if let Some(output_path) = output {
        write_output(output_path, &JsonFormatter::format(&report)?, false)?;
        println!("💾 Aggregation saved to: {}", output_path.display());
        return Ok(());
    }

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_aggregate_report(&report),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&report)?),
    }

    Ok(())
}

/// Print whole-snapshot totals for one file
fn totals_command(input: &Path, format: &str) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(MetricdiffError::invalid_input)?;

    let spec = ColumnSpec::default();
    let snapshot = Snapshot::from_csv_text(&read_input(input)?, &spec);
    let totals = snapshot.totals();

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_totals(&totals),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&totals)?),
    }

    Ok(())
}

/// Build the per-date totals series from a data directory
fn timeline_command(data_dir: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(MetricdiffError::invalid_input)?;

    let resolver = SnapshotResolver::new(data_dir)?;
    let sources = resolver.discover()?;
    if sources.is_empty() {
        println!("No dated snapshots found in {}", data_dir.display());
        return Ok(());
    }

    let spec = ColumnSpec::default();
    let mut cache = SnapshotCache::new();
    let timeline = build_timeline(&sources, &mut cache, &spec)?;

    if let Some(output_path) = output {
        write_output(output_path, &JsonFormatter::format(&timeline)?, false)?;
        println!("💾 Timeline saved to: {}", output_path.display());
        return Ok(());
    }

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_timeline(&timeline),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&timeline)?),
    }

    Ok(())
}
