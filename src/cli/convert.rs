//! CLI command for converting document tables to a spreadsheet

use std::path::PathBuf;

use clap::Args;

use crate::error::{StatementError, StatementResult};
use crate::services::{convert_tables, default_output_path};
use crate::sources::extractor_for;

/// Arguments for `convert`
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input document (.pdf, or a saved .json extraction)
    pub input: PathBuf,

    /// Output xlsx file (default: input with .xlsx extension)
    pub output: Option<PathBuf>,

    /// Drop this many leading rows of the combined tables
    #[arg(long, default_value = "0")]
    pub skip_rows: usize,
}

/// Handle the convert command
pub fn handle_convert_command(args: ConvertArgs) -> StatementResult<()> {
    if !args.input.exists() {
        return Err(StatementError::SourceNotFound(args.input));
    }

    let extractor = extractor_for(&args.input).ok_or_else(|| {
        StatementError::Validation(format!(
            "Unsupported input type: {} (expected .pdf or .json)",
            args.input.display()
        ))
    })?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    let outcome = convert_tables(&args.input, &output, args.skip_rows, extractor.as_ref())?;

    println!(
        "Converted {} table(s), {} row(s) to: {}",
        outcome.tables,
        outcome.rows,
        outcome.output.display()
    );
    Ok(())
}
