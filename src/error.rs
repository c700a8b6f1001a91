//! Error types for metricdiff operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricdiffError>;

/// Errors here are structural: unreadable inputs, bad arguments, missing
/// snapshot directories. Malformed row data (broken quoting, non-numeric
/// counts, missing key columns) never surfaces as an error — the codec and
/// the engines resolve it to safe defaults so a diff or aggregation always
/// completes.
#[derive(Error, Debug)]
pub enum MetricdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot directory not found: {path}")]
    DataDirNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("String conversion error: {0}")]
    StringConversion(#[from] std::string::FromUtf8Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl MetricdiffError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn data_dir_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DataDirNotFound { path: path.into() }
    }
}
