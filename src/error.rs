use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain or parse the salary dataset. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url}: server answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed parquet column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("row {row}: {reason}")]
    InvalidValue { row: usize, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
