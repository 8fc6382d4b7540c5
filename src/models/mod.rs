//! Core data models for statement-summary
//!
//! This module contains the data structures shared by the loaders, the
//! normalizer and the aggregator: money, month keys, typed records and raw
//! cells.

pub mod cell;
pub mod money;
pub mod month;
pub mod record;

pub use cell::{Cell, Grid};
pub use money::Money;
pub use month::MonthKey;
pub use record::{Direction, TransactionRecord};
