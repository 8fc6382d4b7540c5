//! YAML Export functionality
//!
//! Exports a monthly report to YAML for human reading.

use std::io::Write;

use crate::error::{StatementError, StatementResult};
use crate::export::json::ReportExport;
use crate::reports::AggregateReport;
use crate::services::SourceSummary;

/// Export a report to YAML, preceded by a short comment header
pub fn export_report_yaml<W: Write>(
    report: &AggregateReport,
    sources: &[SourceSummary],
    writer: &mut W,
) -> StatementResult<()> {
    let export = ReportExport::from_report(report, sources);
    let io_err = |e: std::io::Error| StatementError::Export(e.to_string());

    writeln!(writer, "# Monthly income/expense summary").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| StatementError::Export(e.to_string()))?;
    Ok(())
}
