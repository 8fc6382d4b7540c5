//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers shared by the monthly report and the batch
//! summary.

use std::path::Path;

use crate::models::Money;
use crate::services::batch::SourceSummary;

/// Format a money amount with the configured currency symbol and two decimals
pub fn format_money(amount: Money, currency_symbol: &str) -> String {
    amount.format_with_symbol(currency_symbol)
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Progress line printed after each source of a batch
pub fn format_progress(completed: usize, total: usize, path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("[{}/{}] {}", completed, total, name)
}

/// Per-source record and drop counts
pub fn format_source_stats(sources: &[SourceSummary]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<32} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "Source", "Records", "Bad date", "Bad amt", "Other", "Header"
    ));
    output.push_str(&separator(78));
    output.push('\n');

    for source in sources {
        let name = source
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.path.display().to_string());
        output.push_str(&format!(
            "{:<32} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            truncate(&name, 32),
            source.stats.records,
            source.stats.dropped_timestamp,
            source.stats.dropped_amount,
            source.stats.dropped_direction,
            source.header_row + 1
        ));
    }

    output
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
