//! Error types for salesdash-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for salesdash-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, shaping or drawing report data.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset file does not exist.
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error while reading a file.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid delimited tabular data.
    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the table.
    #[error("missing column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A value used as a chart height is not a number.
    #[error("column '{column}' row {row}: '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Unknown color name or malformed hex code.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Chart backend failure.
    #[error("chart rendering failed: {0}")]
    Chart(String),

    /// Report content could not be loaded.
    #[error("invalid report content: {0}")]
    Content(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Format the error together with a hint on how to recover from it.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::NotFound(_) => {
                Some("run from the directory holding main_data.csv or pass --data <PATH>")
            }
            Error::Csv { .. } => {
                Some("the dataset must be comma separated with a header row and equal-length rows")
            }
            Error::MissingColumn { .. } => {
                Some("the dataset needs the columns 'order_status' and 'product category'")
            }
            Error::InvalidColor(_) => Some("use a named color such as 'skyblue' or a hex code like '#87ceeb'"),
            Error::Content(_) | Error::Json(_) => {
                Some("check the report content file against the built-in content/report.json")
            }
            Error::Io { .. } | Error::NotNumeric { .. } | Error::Chart(_) => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
