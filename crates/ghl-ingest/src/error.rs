//! Error types for GeneHancer ingestion

use std::path::PathBuf;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for ingestion, assembly and publishing
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An attributes cell token that should be `key=value` is not
    #[error("Malformed attributes token '{token}' in '{cell}'")]
    MalformedAttributes { token: String, cell: String },

    /// A header column the reformatter needs is absent
    #[error("Missing required column '{0}' in header")]
    MissingColumn(String),

    /// A row-level failure, carrying the position of the offending row
    #[error("Row {row} of '{file}': {source}")]
    Row {
        file: String,
        row: usize,
        #[source]
        source: Box<IngestError>,
    },

    #[error("Row has {actual} cells but column '{column}' is at position {position}")]
    ShortRow {
        column: String,
        position: usize,
        actual: usize,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Load plan error: {0}")]
    LoadPlan(String),

    #[error("CX error: {0}")]
    Cx(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    #[error("No input files found in {0}")]
    NoInputFiles(PathBuf),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::Spreadsheet(err.to_string())
    }
}

impl IngestError {
    /// Attach row context to a row-level failure
    pub fn at_row(self, file: impl Into<String>, row: usize) -> Self {
        IngestError::Row {
            file: file.into(),
            row,
            source: Box::new(self),
        }
    }
}
