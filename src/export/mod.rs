//! Export module for statement-summary
//!
//! Writes a monthly report to a file, choosing the format by extension:
//! - CSV: the monthly table (spreadsheet-compatible)
//! - JSON: machine-readable report with per-source counts
//! - YAML: human-readable version of the JSON export

pub mod csv;
pub mod json;
pub mod yaml;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{StatementError, StatementResult};
use crate::reports::AggregateReport;
use crate::services::SourceSummary;

pub use self::csv::export_report_csv;
pub use json::{export_report_json, ReportExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_report_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Pick a format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> StatementResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(StatementError::Export(format!(
                "Unsupported export format for {} (use .csv, .json or .yaml)",
                path.display()
            ))),
        }
    }
}

/// Write a report to `path` in the format implied by its extension
pub fn export_report(
    report: &AggregateReport,
    sources: &[SourceSummary],
    path: &Path,
) -> StatementResult<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path)
        .map_err(|e| StatementError::Export(format!("Cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => export_report_csv(report, &mut writer)?,
        ExportFormat::Json => export_report_json(report, sources, &mut writer)?,
        ExportFormat::Yaml => export_report_yaml(report, sources, &mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| StatementError::Export(e.to_string()))?;
    Ok(format)
}
