//! Configuration module for statement-summary
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence (column and direction labels, header detection)

pub mod paths;
pub mod settings;

pub use paths::StatementPaths;
pub use settings::{ColumnLabels, DirectionLabels, HeaderDetection, Settings};
