//! Command-line interface for metricdiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metricdiff")]
#[command(about = "A snapshot diff and aggregation tool for code-metrics CSV inventories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two snapshot CSV files and write the diff table
    Diff {
        /// Baseline snapshot CSV
        csv1: PathBuf,

        /// Comparison snapshot CSV
        csv2: PathBuf,

        /// Output file for the diff table
        output: PathBuf,

        /// Skip the byte-order mark prefix on the output file
        #[arg(long)]
        no_bom: bool,
    },

    /// Aggregate per-key metric deltas into grouped totals
    Aggregate {
        /// Baseline snapshot CSV
        csv1: PathBuf,

        /// Comparison snapshot CSV
        csv2: PathBuf,

        /// Metric to aggregate: "line_count", "package_count", or "module_count"
        #[arg(long, default_value = "line_count")]
        metric: String,

        /// Group label attribute: "package" or "contributor"
        #[arg(long, default_value = "package")]
        group_by: String,

        /// Keep only positive deltas (additions-only view)
        #[arg(long)]
        positive_only: bool,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Write the JSON report to a file instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print whole-snapshot totals for one CSV file
    Totals {
        /// Snapshot CSV
        input: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Per-date totals across a directory of dated snapshot files
    Timeline {
        /// Directory holding YYYY-MM-DD.csv files or YYYY-MM-DD/summary.csv layouts
        data_dir: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Write the JSON series to a file instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
