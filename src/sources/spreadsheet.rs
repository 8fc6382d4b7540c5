//! Spreadsheet and CSV reading, xlsx writing
//!
//! Reading goes through calamine (xlsx, xls, xlsb, ods) or the csv crate.
//! Only the first worksheet of a workbook is read. Writing produces a single
//! sheet with rust_xlsxwriter.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::{StatementError, StatementResult};
use crate::models::{Cell, Grid};

/// Read the first worksheet of a workbook into a grid
///
/// Leading empty rows and columns before the used range are kept as empty
/// cells so row indices match what a spreadsheet application shows.
pub fn read_workbook(path: &Path) -> StatementResult<Grid> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StatementError::Spreadsheet("Workbook contains no sheets".into()))??;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid: Grid = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_data));
        grid.push(cells);
    }

    debug!(path = %path.display(), rows = grid.len(), "read workbook");
    Ok(grid)
}

fn convert_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::DateTime(datetime),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Read a CSV file into a grid without interpreting any header
///
/// Rows may have differing lengths. Bytes that are not valid UTF-8 are
/// replaced rather than rejected.
pub fn read_csv(path: &Path) -> StatementResult<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Grid::new();
    for record in reader.byte_records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                let text = String::from_utf8_lossy(field);
                if text.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(text.into_owned())
                }
            })
            .collect();
        grid.push(row);
    }

    debug!(path = %path.display(), rows = grid.len(), "read csv");
    Ok(grid)
}

/// Write a grid to a single-sheet xlsx file
///
/// Grid cell (r, c) lands in spreadsheet row r+1, column c+1. Empty cells
/// are left blank; no header row is added.
pub fn write_grid(grid: &Grid, path: &Path, sheet_name: &str) -> StatementResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (row_idx, row) in grid.iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| StatementError::Spreadsheet("Too many rows for xlsx".into()))?;

        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| StatementError::Spreadsheet("Too many columns for xlsx".into()))?;

            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col_num, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                Cell::DateTime(_) => {
                    worksheet.write_string(row_num, col_num, cell.to_string())?;
                }
            }
        }
    }

    workbook.save(path)?;
    debug!(path = %path.display(), rows = grid.len(), "wrote xlsx");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_write_then_read_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.xlsx");
        let grid = vec![
            vec![text("交易时间"), text("收/支/其他"), text("金额(元)")],
            vec![text("2024-01-01 09:30:00"), text("收入"), Cell::Number(12.5)],
            vec![Cell::Empty, text("ragged")],
        ];

        write_grid(&grid, &path, "Tables").unwrap();
        let read = read_workbook(&path).unwrap();

        assert_eq!(read[0][0], text("交易时间"));
        assert_eq!(read[1][2], Cell::Number(12.5));
        assert_eq!(read[2][1], text("ragged"));
    }

    #[test]
    fn test_read_workbook_keeps_leading_offset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("offset.xlsx");
        let grid = vec![
            vec![],
            vec![],
            vec![Cell::Empty, text("header")],
        ];

        write_grid(&grid, &path, "Sheet1").unwrap();
        let read = read_workbook(&path).unwrap();

        assert_eq!(read.len(), 3);
        assert_eq!(read[2][1], text("header"));
    }

    #[test]
    fn test_read_csv_flexible() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bill.csv");
        std::fs::write(
            &path,
            "微信支付账单明细\n交易时间,收/支/其他,金额(元)\n2024-01-01,收入,10,extra\n",
        )
        .unwrap();

        let grid = read_csv(&path).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0].len(), 1);
        assert_eq!(grid[2].len(), 4);
        assert_eq!(grid[1][2], text("金额(元)"));
    }

    #[test]
    fn test_read_missing_workbook_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_workbook(&temp_dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(StatementError::Spreadsheet(_))));
    }
}
