//! CSV Export functionality
//!
//! Writes the monthly table as CSV: a header, one row per month, then the
//! Total and Average rows.

use std::io::Write;

use crate::error::StatementResult;
use crate::reports::AggregateReport;

/// Export a report to CSV
pub fn export_report_csv<W: Write>(report: &AggregateReport, writer: &mut W) -> StatementResult<()> {
    report.export_csv(writer)
}
