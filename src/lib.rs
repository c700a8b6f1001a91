//! # metricdiff
//!
//! A snapshot diff and aggregation tool for code-metrics CSV inventories:
//! row-level diffs between two dated snapshots (added/deleted/modified/
//! unchanged with signed deltas) and grouped delta rollups by package or
//! contributor for visualization.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod csv;
pub mod diff;
pub mod error;
pub mod output;
pub mod resolver;
pub mod snapshot;

pub use error::{MetricdiffError, Result};
pub use snapshot::{ColumnSpec, Record, Snapshot, Totals};
