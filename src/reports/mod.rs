//! Reports module for statement-summary
//!
//! Provides the monthly income/expense report, its merge across sources,
//! and its terminal and CSV renderings.

pub mod monthly;

pub use monthly::{AggregateReport, ColumnSummary, MonthlyTotal, ReportSummary};
