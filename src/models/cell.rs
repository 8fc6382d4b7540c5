//! Raw cell values as read from a statement source
//!
//! Sources (spreadsheets, CSV files, extracted PDF tables) are loaded into a
//! `Grid`: rows of cells, not necessarily all the same length.

use chrono::NaiveDateTime;
use std::fmt;

/// A single untyped cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// Rows of cells; rows may have differing lengths
pub type Grid = Vec<Vec<Cell>>;

impl Cell {
    /// Text cell, or `Empty` for `None`
    pub fn from_optional_text(value: Option<String>) -> Self {
        match value {
            Some(text) => Self::Text(text),
            None => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text content, if this is a non-empty text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Get a cell from a possibly ragged row; missing cells read as `Empty`
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    row.get(index).unwrap_or(EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::Text("  ".into()).is_empty());
        assert!(!Cell::Text("x".into()).is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(Cell::Number(10.0).to_string(), "10");
        assert_eq!(Cell::Number(10.5).to_string(), "10.5");
        assert_eq!(Cell::Bool(true).to_string(), "TRUE");
    }

    #[test]
    fn test_cell_at_ragged_row() {
        let row = vec![Cell::Text("a".into())];
        assert_eq!(cell_at(&row, 0), &Cell::Text("a".into()));
        assert_eq!(cell_at(&row, 5), &Cell::Empty);
    }

    #[test]
    fn test_from_optional_text() {
        assert_eq!(Cell::from_optional_text(None), Cell::Empty);
        assert_eq!(Cell::from_optional_text(Some("x".into())), Cell::Text("x".into()));
    }
}
