//! CLI commands for settings: `init` and `config`

use crate::config::{Settings, StatementPaths};
use crate::error::StatementResult;

/// Write the default settings file, creating the config directory if needed
///
/// Any existing settings file is replaced without being read.
pub fn handle_init_command(paths: &StatementPaths) -> StatementResult<()> {
    Settings::default().save(paths)?;

    println!("Settings written to: {}", paths.settings_file().display());
    println!();
    println!("Edit this file to change the column labels, direction labels,");
    println!("header detection or the file extensions scanned in directories.");
    Ok(())
}

/// Show paths and the effective settings
pub fn handle_config_command(paths: &StatementPaths, settings: &Settings) -> StatementResult<()> {
    println!("statement-summary Configuration");
    println!("===============================");
    println!("Config directory: {}", paths.base_dir().display());
    println!(
        "Settings file:    {}{}",
        paths.settings_file().display(),
        if paths.is_initialized() { "" } else { " (not created, using defaults)" }
    );
    println!();
    println!("Columns:");
    println!("  Timestamp: {}", settings.columns.timestamp);
    println!("  Direction: {}", settings.columns.direction);
    println!("  Amount:    {}", settings.columns.amount);
    println!("Directions:");
    println!("  Income:  {}", settings.directions.income);
    println!("  Expense: {}", settings.directions.expense);
    println!("Header detection:");
    println!("  Enabled:   {}", settings.header_detection.enabled);
    println!("  Threshold: {}", settings.header_detection.threshold);
    println!("  Scan rows: {}", settings.header_detection.scan_rows);
    println!("Currency symbol: {}", settings.currency_symbol);
    println!("File extensions: {}", settings.file_extensions.join(", "));
    Ok(())
}
