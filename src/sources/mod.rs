//! Statement source loading
//!
//! Turns a file path into a raw grid, whatever the container format:
//! spreadsheets via calamine, CSV via the csv crate, and PDF or saved
//! extraction results via a `TableExtractor`.

pub mod extraction;
pub mod spreadsheet;

use std::path::Path;

use crate::error::{StatementError, StatementResult};
use crate::models::Grid;

pub use extraction::{
    extractor_for, flatten_tables, parse_layout_text, ExtractedPage, ExtractedTable,
    ExtractionResult, JsonExtractor, LayoutTextExtractor, TableExtractor,
};
pub use spreadsheet::{read_csv, read_workbook, write_grid};

/// Container format of a statement source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Workbook,
    Csv,
    Pdf,
    ExtractionJson,
}

impl SourceKind {
    /// Determine the kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Workbook),
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            "json" => Some(Self::ExtractionJson),
            _ => None,
        }
    }
}

/// Load a statement file into a raw grid
///
/// Fails with `SourceNotFound` before any parsing when the path does not
/// exist, and with `NoTablesFound` when a document yields zero tables.
pub fn load_grid(path: &Path) -> StatementResult<Grid> {
    if !path.exists() {
        return Err(StatementError::SourceNotFound(path.to_path_buf()));
    }

    let kind = SourceKind::from_path(path).ok_or_else(|| {
        StatementError::Validation(format!("Unsupported file type: {}", path.display()))
    })?;

    match kind {
        SourceKind::Workbook => read_workbook(path),
        SourceKind::Csv => read_csv(path),
        SourceKind::Pdf => load_tables(path, &LayoutTextExtractor::default()),
        SourceKind::ExtractionJson => load_tables(path, &JsonExtractor),
    }
}

/// Extract and flatten the tables of a document
pub fn load_tables(path: &Path, extractor: &dyn TableExtractor) -> StatementResult<Grid> {
    let result = extractor.extract(path)?;
    flatten_tables(&result).ok_or_else(|| StatementError::NoTablesFound(path.to_path_buf()))
}
