//! Row normalization
//!
//! Turns a raw cell grid into typed transaction records: locates the header
//! row, resolves the three required columns, then parses each data row.
//! Rows with an unparseable timestamp or amount, or a direction other than
//! income/expense, are dropped and only counted in `NormalizeStats`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::error::{StatementError, StatementResult};
use crate::models::cell::cell_at;
use crate::models::{Cell, Direction, Grid, Money, TransactionRecord};

/// Date-time formats tried, in order, for text timestamps
const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S",
    "%Y年%m月%d日 %H:%M:%S",
];

/// Date-only formats; the time defaults to midnight
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y年%m月%d日",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

/// Largest Excel serial date (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub timestamp: usize,
    pub direction: usize,
    pub amount: usize,
}

/// Counts of what happened to each row of a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Non-blank rows below the header
    pub rows_scanned: usize,
    /// Rows that became records
    pub records: usize,
    /// Completely blank rows, ignored
    pub blank_rows: usize,
    pub dropped_timestamp: usize,
    pub dropped_amount: usize,
    pub dropped_direction: usize,
}

impl NormalizeStats {
    /// Total rows silently dropped
    pub fn dropped(&self) -> usize {
        self.dropped_timestamp + self.dropped_amount + self.dropped_direction
    }

    /// Add another source's counts to these
    pub fn absorb(&mut self, other: &NormalizeStats) {
        self.rows_scanned += other.rows_scanned;
        self.records += other.records;
        self.blank_rows += other.blank_rows;
        self.dropped_timestamp += other.dropped_timestamp;
        self.dropped_amount += other.dropped_amount;
        self.dropped_direction += other.dropped_direction;
    }
}

/// Output of normalizing one source
#[derive(Debug, Clone)]
pub struct NormalizedSource {
    /// Index of the header row within the grid
    pub header_row: usize,
    /// Qualifying records, in source order
    pub records: Vec<TransactionRecord>,
    pub stats: NormalizeStats,
}

/// Normalizes raw grids according to the configured labels
pub struct RowNormalizer<'a> {
    settings: &'a Settings,
}

impl<'a> RowNormalizer<'a> {
    /// Create a new normalizer
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Find the header row
    ///
    /// With detection enabled, the first row (from the top, within the scan
    /// limit) containing at least `threshold` expected labels is the header.
    /// With detection disabled the header is always row 0.
    pub fn locate_header(&self, grid: &Grid) -> StatementResult<usize> {
        let detection = &self.settings.header_detection;
        if !detection.enabled {
            return Ok(0);
        }

        let expected = self.settings.expected_labels();
        let scanned = grid.len().min(detection.scan_rows);

        grid.iter()
            .take(detection.scan_rows)
            .position(|row| count_matching_labels(row, &expected) >= detection.threshold)
            .ok_or(StatementError::HeaderNotFound {
                scanned,
                threshold: detection.threshold,
            })
    }

    /// Resolve the required columns from a header row
    pub fn resolve_columns(&self, header: &[Cell]) -> StatementResult<ColumnIndices> {
        let find = |label: &str| {
            header
                .iter()
                .position(|cell| cell.as_text() == Some(label.trim()))
                .ok_or_else(|| StatementError::missing_column(label))
        };

        let columns = &self.settings.columns;
        Ok(ColumnIndices {
            timestamp: find(&columns.timestamp)?,
            direction: find(&columns.direction)?,
            amount: find(&columns.amount)?,
        })
    }

    /// Normalize a grid into records
    pub fn normalize(&self, grid: &Grid) -> StatementResult<NormalizedSource> {
        let header_row = self.locate_header(grid)?;
        let header = grid.get(header_row).map(Vec::as_slice).unwrap_or(&[]);
        let columns = self.resolve_columns(header)?;

        let mut stats = NormalizeStats::default();
        let mut records = Vec::new();

        for row in grid.iter().skip(header_row + 1) {
            if row.iter().all(Cell::is_empty) {
                stats.blank_rows += 1;
                continue;
            }
            stats.rows_scanned += 1;

            let Some(timestamp) = parse_timestamp(cell_at(row, columns.timestamp)) else {
                stats.dropped_timestamp += 1;
                continue;
            };

            let Some(amount) = parse_amount(cell_at(row, columns.amount)) else {
                stats.dropped_amount += 1;
                continue;
            };

            let direction = self.classify(cell_at(row, columns.direction));
            if !direction.is_counted() {
                stats.dropped_direction += 1;
                continue;
            }

            records.push(TransactionRecord::new(timestamp, direction, amount));
        }

        stats.records = records.len();
        debug!(
            header_row,
            records = stats.records,
            dropped_timestamp = stats.dropped_timestamp,
            dropped_amount = stats.dropped_amount,
            dropped_direction = stats.dropped_direction,
            "normalized source"
        );

        Ok(NormalizedSource {
            header_row,
            records,
            stats,
        })
    }

    fn classify(&self, cell: &Cell) -> Direction {
        let labels = &self.settings.directions;
        match cell.as_text() {
            Some(text) => Direction::classify(text, labels.income.trim(), labels.expense.trim()),
            None => Direction::Other,
        }
    }
}

fn count_matching_labels(row: &[Cell], expected: &[&str]) -> usize {
    expected
        .iter()
        .filter(|label| row.iter().any(|cell| cell.as_text() == Some(label.trim())))
        .count()
}

/// Parse a timestamp cell tolerantly
///
/// Accepts native spreadsheet date-times, Excel serial numbers and text in
/// common date or date-time layouts. Returns `None` for anything else.
pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(serial) => excel_serial_to_datetime(*serial),
        Cell::Text(text) => parse_timestamp_text(text.trim()),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn parse_timestamp_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Convert an Excel serial date (1900 date system) to a date-time
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial >= MAX_EXCEL_SERIAL {
        return None;
    }

    // Day zero is 1899-12-30 once the 1900 leap-year bug is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Parse an amount cell; `None` when it is not a valid number
pub fn parse_amount(cell: &Cell) -> Option<Money> {
    match cell {
        Cell::Number(n) => Money::from_f64(*n),
        Cell::Text(text) => Money::parse(text).ok(),
        Cell::Empty | Cell::Bool(_) | Cell::DateTime(_) => None,
    }
}
