//! CLI command for the monthly report
//!
//! Loads every input, prints the merged monthly table and optionally a
//! chart, per-source counts or an export file.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::Settings;
use crate::display::{format_progress, format_source_stats};
use crate::error::StatementResult;
use crate::export::export_report;
use crate::services::{collect_inputs, BatchRunner};

/// Width of the bars drawn by `--chart`
const CHART_WIDTH: usize = 30;

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Statement files or directories of statements
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Export to a file (.csv, .json, .yaml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show a bar chart of income and expense per month
    #[arg(long)]
    pub chart: bool,

    /// Show per-file record and dropped-row counts
    #[arg(long)]
    pub stats: bool,

    /// Do not print progress while processing files
    #[arg(short, long)]
    pub quiet: bool,
}

/// Handle the report command
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> StatementResult<()> {
    let files = collect_inputs(&args.inputs, &settings.file_extensions)?;
    info!(count = files.len(), "processing statement files");

    let outcome = BatchRunner::new(settings).run(&files, |completed, total, path| {
        if !args.quiet {
            eprintln!("{}", format_progress(completed, total, path));
        }
    })?;

    println!("{}", outcome.report.format_terminal(&settings.currency_symbol));

    if args.chart && !outcome.report.is_empty() {
        println!();
        print!(
            "{}",
            outcome
                .report
                .format_chart(&settings.currency_symbol, CHART_WIDTH)
        );
    }

    if args.stats {
        println!();
        print!("{}", format_source_stats(&outcome.sources));
        let total = outcome.total_stats();
        println!(
            "{} records, {} rows dropped ({} bad date, {} bad amount, {} other direction)",
            total.records,
            total.dropped(),
            total.dropped_timestamp,
            total.dropped_amount,
            total.dropped_direction
        );
    }

    if let Some(path) = args.output {
        let format = export_report(&outcome.report, &outcome.sources, &path)?;
        println!();
        println!("Exported {:?} report to: {}", format, path.display());
    }

    Ok(())
}
