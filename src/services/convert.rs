//! Document-to-spreadsheet conversion
//!
//! Extracts every table of a document, concatenates them and writes the
//! result to a single xlsx sheet named `Tables`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{StatementError, StatementResult};
use crate::sources::{flatten_tables, write_grid, TableExtractor};

/// Name of the sheet written by the converter
pub const TABLES_SHEET: &str = "Tables";

/// Summary of a finished conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    pub output: PathBuf,
    /// Rows written after skipping
    pub rows: usize,
    /// Tables found in the input
    pub tables: usize,
}

/// Input path with its extension replaced by `xlsx`
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}

/// Convert the tables of `input` into an xlsx file at `output`
///
/// The first `skip_rows` rows of the concatenated grid are dropped. Fails
/// with `NoTablesFound` when the document has no tables; no file is written
/// in that case.
pub fn convert_tables(
    input: &Path,
    output: &Path,
    skip_rows: usize,
    extractor: &dyn TableExtractor,
) -> StatementResult<ConversionOutcome> {
    if !input.exists() {
        return Err(StatementError::SourceNotFound(input.to_path_buf()));
    }
    if input == output {
        return Err(StatementError::Validation(format!(
            "Output path must differ from input: {}",
            output.display()
        )));
    }

    let result = extractor.extract(input)?;
    let tables = result.table_count();
    let grid = flatten_tables(&result)
        .ok_or_else(|| StatementError::NoTablesFound(input.to_path_buf()))?;

    let rows: Vec<_> = grid.into_iter().skip(skip_rows).collect();
    write_grid(&rows, output, TABLES_SHEET)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        tables,
        rows = rows.len(),
        "converted document"
    );

    Ok(ConversionOutcome {
        output: output.to_path_buf(),
        rows: rows.len(),
        tables,
    })
}
