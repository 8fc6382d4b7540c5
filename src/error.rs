//! Custom error types for statement-summary
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Row-level data problems (bad dates, bad
//! amounts, unrecognized directions) are not errors; the normalizer drops
//! those rows and only counts them.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for statement-summary operations
#[derive(Error, Debug)]
pub enum StatementError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required column is missing from the header row
    #[error("Missing required column: {column}")]
    Schema { column: String },

    /// No row within the scanned range looked like a header
    #[error("Header row not found in the first {scanned} rows (need {threshold} matching labels)")]
    HeaderNotFound { scanned: usize, threshold: usize },

    /// Input path does not exist
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A batch directory holds no statement files
    #[error("No statement files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    /// A document yielded zero tables
    #[error("No tables found in {}", .0.display())]
    NoTablesFound(PathBuf),

    /// A source-level failure, tagged with the source it came from
    #[error("Failed to process {path}: {cause}")]
    InSource {
        path: String,
        cause: Box<StatementError>,
    },

    /// Spreadsheet read/write errors
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Table extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl StatementError {
    /// Create a schema error for a missing column
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    /// Wrap an error with the source it was raised for
    pub fn in_source(path: &Path, cause: StatementError) -> Self {
        Self::InSource {
            path: path.display().to_string(),
            cause: Box::new(cause),
        }
    }

    /// The innermost error, skipping source tags
    pub fn root_cause(&self) -> &StatementError {
        match self {
            Self::InSource { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self.root_cause(), Self::Schema { .. })
    }

    /// Check if this is a header detection error
    pub fn is_header_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::HeaderNotFound { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for StatementError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StatementError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for StatementError {
    fn from(err: csv::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<calamine::Error> for StatementError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for StatementError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

/// Result type alias for statement-summary operations
pub type StatementResult<T> = Result<T, StatementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatementError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_schema_error_names_column() {
        let err = StatementError::missing_column("金额(元)");
        assert_eq!(err.to_string(), "Missing required column: 金额(元)");
        assert!(err.is_schema());
    }

    #[test]
    fn test_in_source_keeps_cause() {
        let err = StatementError::in_source(
            Path::new("jan.xlsx"),
            StatementError::HeaderNotFound {
                scanned: 10,
                threshold: 3,
            },
        );
        assert!(err.to_string().starts_with("Failed to process jan.xlsx: Header row not found"));
        assert!(err.is_header_not_found());
        assert!(!err.is_schema());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StatementError = io_err.into();
        assert!(matches!(err, StatementError::Io(_)));
    }
}
