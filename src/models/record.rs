//! Typed transaction rows
//!
//! A `TransactionRecord` is a statement row whose timestamp and amount parsed
//! successfully. Only Income and Expense records contribute to totals.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Money, MonthKey};

/// Direction of money flow for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money received
    Income,
    /// Money spent
    Expense,
    /// Transfers, refunds and anything else that is neither
    Other,
}

impl Direction {
    /// Classify a raw direction label against the configured income and
    /// expense labels. Matching is exact after trimming whitespace.
    pub fn classify(label: &str, income_label: &str, expense_label: &str) -> Self {
        let label = label.trim();
        if label == income_label {
            Self::Income
        } else if label == expense_label {
            Self::Expense
        } else {
            Self::Other
        }
    }

    /// Whether records with this direction participate in totals
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A normalized statement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// When the transaction happened
    pub timestamp: NaiveDateTime,
    /// Income, expense or other
    pub direction: Direction,
    /// Amount as shown on the statement
    pub amount: Money,
}

impl TransactionRecord {
    pub fn new(timestamp: NaiveDateTime, direction: Direction, amount: Money) -> Self {
        Self {
            timestamp,
            direction,
            amount,
        }
    }

    /// The month this record is grouped under
    pub fn month(&self) -> MonthKey {
        MonthKey::from_datetime(&self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_classify() {
        assert_eq!(Direction::classify("收入", "收入", "支出"), Direction::Income);
        assert_eq!(Direction::classify(" 支出 ", "收入", "支出"), Direction::Expense);
        assert_eq!(Direction::classify("其他", "收入", "支出"), Direction::Other);
        assert_eq!(Direction::classify("/", "收入", "支出"), Direction::Other);
    }

    #[test]
    fn test_is_counted() {
        assert!(Direction::Income.is_counted());
        assert!(Direction::Expense.is_counted());
        assert!(!Direction::Other.is_counted());
    }

    #[test]
    fn test_record_month() {
        let ts = NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let record = TransactionRecord::new(ts, Direction::Income, Money::from_cents(5000));
        assert_eq!(record.month().to_string(), "2024-04");
    }
}
