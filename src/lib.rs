//! statement-summary - Monthly income/expense summaries from payment statements
//!
//! This library reads exported payment-platform statements (spreadsheets,
//! CSV files, or tables extracted from PDFs), normalizes their transaction
//! rows, and aggregates income and expense per calendar month.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, month keys, records, raw cells)
//! - `sources`: Loading spreadsheets, CSV and extracted document tables
//! - `services`: Row normalization, batch processing and conversion
//! - `reports`: Monthly aggregation and merging
//! - `display`: Terminal formatting helpers
//! - `export`: CSV, JSON and YAML report export
//! - `cli`: Command handlers for the `stmtsum` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use statement_summary::config::Settings;
//! use statement_summary::services::BatchRunner;
//!
//! let settings = Settings::default();
//! let outcome = BatchRunner::new(&settings).run(&files, |_, _, _| {})?;
//! println!("{}", outcome.report.format_terminal("¥"));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod sources;

pub use error::{StatementError, StatementResult};
