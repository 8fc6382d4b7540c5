//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod config;
pub mod convert;
pub mod report;

pub use config::{handle_config_command, handle_init_command};
pub use convert::{handle_convert_command, ConvertArgs};
pub use report::{handle_report_command, ReportArgs};
