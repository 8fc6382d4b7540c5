//! JSON Export functionality
//!
//! Exports a monthly report to JSON with schema versioning. Amounts are
//! written as fixed two-decimal strings so no precision is lost to floats.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StatementError, StatementResult};
use crate::models::Money;
use crate::reports::{AggregateReport, ColumnSummary};
use crate::services::{NormalizeStats, SourceSummary};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full report export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// One entry per month, ascending
    pub months: Vec<MonthExport>,

    pub total: AmountsExport,

    /// Absent when the report has no months
    pub average: Option<AmountsExport>,

    /// Files the report was built from
    #[serde(default)]
    pub sources: Vec<SourceExport>,
}

/// Income, expense and net for one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountsExport {
    pub income: String,
    pub expense: String,
    pub net: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthExport {
    /// `YYYY-MM`
    pub month: String,
    #[serde(flatten)]
    pub amounts: AmountsExport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExport {
    pub path: String,
    pub header_row: usize,
    pub records: usize,
    pub dropped_timestamp: usize,
    pub dropped_amount: usize,
    pub dropped_direction: usize,
}

impl AmountsExport {
    fn new(income: Money, expense: Money, net: Money) -> Self {
        Self {
            income: income.to_decimal_string(),
            expense: expense.to_decimal_string(),
            net: net.to_decimal_string(),
        }
    }
}

impl From<&SourceSummary> for SourceExport {
    fn from(source: &SourceSummary) -> Self {
        let NormalizeStats {
            records,
            dropped_timestamp,
            dropped_amount,
            dropped_direction,
            ..
        } = source.stats;
        Self {
            path: source.path.display().to_string(),
            header_row: source.header_row,
            records,
            dropped_timestamp,
            dropped_amount,
            dropped_direction,
        }
    }
}

impl ReportExport {
    /// Build the export structure from a report and its sources
    pub fn from_report(report: &AggregateReport, sources: &[SourceSummary]) -> Self {
        let months = report
            .months()
            .iter()
            .map(|m| MonthExport {
                month: m.month.to_string(),
                amounts: AmountsExport::new(m.income, m.expense, m.net),
            })
            .collect();

        let summary = report.summary();
        let total = AmountsExport::new(summary.income.sum, summary.expense.sum, summary.net.sum);
        let average = match (summary.income, summary.expense, summary.net) {
            (
                ColumnSummary { mean: Some(i), .. },
                ColumnSummary { mean: Some(e), .. },
                ColumnSummary { mean: Some(n), .. },
            ) => Some(AmountsExport::new(i, e, n)),
            _ => None,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            months,
            total,
            average,
            sources: sources.iter().map(SourceExport::from).collect(),
        }
    }
}

/// Export a report to pretty-printed JSON
pub fn export_report_json<W: Write>(
    report: &AggregateReport,
    sources: &[SourceSummary],
    writer: &mut W,
) -> StatementResult<()> {
    let export = ReportExport::from_report(report, sources);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| StatementError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| StatementError::Export(e.to_string()))?;
    Ok(())
}
