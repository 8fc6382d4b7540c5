//! Table extraction from documents
//!
//! An extraction result is page-structured: pages hold detected tables, each
//! table a grid of optional cell strings. `flatten_tables` concatenates every
//! table in encounter order into a single grid. Extraction itself sits behind
//! the `TableExtractor` trait: either `pdftotext -layout` output split into
//! tables, or a pre-computed result stored as JSON.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StatementError, StatementResult};
use crate::models::{Cell, Grid};

/// One detected table: rows of cells, `None` for a missing cell
pub type ExtractedTable = Vec<Vec<Option<String>>>;

/// Tables detected on a single page, in detection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    #[serde(default)]
    pub tables: Vec<ExtractedTable>,
}

/// Everything extracted from one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub pages: Vec<ExtractedPage>,
}

impl ExtractionResult {
    /// Number of tables across all pages
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }
}

/// Concatenate all tables into one grid
///
/// Order is page, then table within page, then row within table. Rows are
/// kept as-is (no deduplication, no column alignment). Returns `None` when
/// the document has no tables at all, and an empty grid when tables were
/// found but hold no rows.
pub fn flatten_tables(result: &ExtractionResult) -> Option<Grid> {
    if result.table_count() == 0 {
        return None;
    }

    let grid = result
        .pages
        .iter()
        .flat_map(|page| page.tables.iter())
        .flat_map(|table| table.iter())
        .map(|row| row.iter().cloned().map(Cell::from_optional_text).collect())
        .collect();

    Some(grid)
}

/// Source of page-structured tables for a document
pub trait TableExtractor {
    fn extract(&self, path: &Path) -> StatementResult<ExtractionResult>;
}

/// Reads an extraction result saved as JSON
///
/// Format: `{"pages": [{"tables": [[["cell", null], ...], ...]}, ...]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl TableExtractor for JsonExtractor {
    fn extract(&self, path: &Path) -> StatementResult<ExtractionResult> {
        let file = std::fs::File::open(path)?;
        let result: ExtractionResult = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                StatementError::Extraction(format!(
                    "Invalid extraction file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        debug!(path = %path.display(), tables = result.table_count(), "loaded extraction json");
        Ok(result)
    }
}

/// Extracts tables from a PDF via `pdftotext -layout`
#[derive(Debug, Clone)]
pub struct LayoutTextExtractor {
    program: String,
}

impl Default for LayoutTextExtractor {
    fn default() -> Self {
        Self {
            program: "pdftotext".to_string(),
        }
    }
}

impl LayoutTextExtractor {
    /// Use a different executable name or path
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, path: &Path) -> StatementResult<String> {
        let program = which::which(&self.program).map_err(|_| {
            StatementError::Extraction(format!(
                "{} not installed (install poppler-utils / poppler)",
                self.program
            ))
        })?;

        let output = Command::new(program)
            .arg("-layout")
            .arg(path)
            .arg("-")
            .output()
            .map_err(|e| {
                StatementError::Extraction(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StatementError::Extraction(format!(
                "{} failed (exit {}): {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TableExtractor for LayoutTextExtractor {
    fn extract(&self, path: &Path) -> StatementResult<ExtractionResult> {
        let text = self.run(path)?;
        let result = parse_layout_text(&text);
        info!(
            path = %path.display(),
            pages = result.pages.len(),
            tables = result.table_count(),
            "extracted tables"
        );
        Ok(result)
    }
}

fn column_gap() -> &'static Regex {
    static GAP: OnceLock<Regex> = OnceLock::new();
    GAP.get_or_init(|| Regex::new(r"\s{2,}").expect("static regex is valid"))
}

/// Split layout-preserving text into pages and tables
///
/// Pages are separated by form feeds. Within a page, a table is a run of at
/// least two consecutive lines that each split into two or more cells on
/// gaps of two or more spaces. Any other line ends the current run.
pub fn parse_layout_text(text: &str) -> ExtractionResult {
    let mut pages = Vec::new();

    for page_text in text.split('\x0c') {
        let mut tables = Vec::new();
        let mut current: ExtractedTable = Vec::new();

        for line in page_text.lines() {
            let trimmed = line.trim();
            let cells: Vec<Option<String>> = if trimmed.is_empty() {
                Vec::new()
            } else {
                column_gap()
                    .split(trimmed)
                    .map(|cell| Some(cell.to_string()))
                    .collect()
            };

            if cells.len() >= 2 {
                current.push(cells);
            } else {
                close_table(&mut current, &mut tables);
            }
        }
        close_table(&mut current, &mut tables);

        pages.push(ExtractedPage { tables });
    }

    // Trailing form feed produces an empty final page
    if pages.last().is_some_and(|p| p.tables.is_empty()) && text.ends_with('\x0c') {
        pages.pop();
    }

    ExtractionResult { pages }
}

fn close_table(current: &mut ExtractedTable, tables: &mut Vec<ExtractedTable>) {
    if current.len() >= 2 {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Pick an extractor for a document by file extension
pub fn extractor_for(path: &Path) -> Option<Box<dyn TableExtractor>> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(Box::new(LayoutTextExtractor::default())),
        "json" => Some(Box::new(JsonExtractor)),
        _ => None,
    }
}
