//! User settings for statement-summary
//!
//! Column labels, direction labels, header detection and display preferences.
//! Defaults match the WeChat Pay transaction export.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::paths::StatementPaths;
use crate::error::StatementError;

/// Labels of the three columns the normalizer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLabels {
    /// Transaction timestamp column
    #[serde(default = "default_timestamp_label")]
    pub timestamp: String,
    /// Income/expense/other column
    #[serde(default = "default_direction_label")]
    pub direction: String,
    /// Amount column
    #[serde(default = "default_amount_label")]
    pub amount: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            timestamp: default_timestamp_label(),
            direction: default_direction_label(),
            amount: default_amount_label(),
        }
    }
}

impl ColumnLabels {
    /// The labels in (timestamp, direction, amount) order
    pub fn required(&self) -> [&str; 3] {
        [
            self.timestamp.as_str(),
            self.direction.as_str(),
            self.amount.as_str(),
        ]
    }
}

/// Values of the direction column that mean income or expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionLabels {
    #[serde(default = "default_income_label")]
    pub income: String,
    #[serde(default = "default_expense_label")]
    pub expense: String,
}

impl Default for DirectionLabels {
    fn default() -> Self {
        Self {
            income: default_income_label(),
            expense: default_expense_label(),
        }
    }
}

/// Header row auto-detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDetection {
    /// When false the first row is always the header
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum number of expected labels a row must contain
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// How many rows from the top to scan
    #[serde(default = "default_scan_rows")]
    pub scan_rows: usize,

    /// Labels besides the required ones that count towards the threshold
    #[serde(default = "default_extra_labels")]
    pub extra_labels: Vec<String>,
}

impl Default for HeaderDetection {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
            scan_rows: default_scan_rows(),
            extra_labels: default_extra_labels(),
        }
    }
}

/// User settings for statement-summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub columns: ColumnLabels,

    #[serde(default)]
    pub directions: DirectionLabels,

    #[serde(default)]
    pub header_detection: HeaderDetection,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// File extensions picked up when scanning a directory
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timestamp_label() -> String {
    "交易时间".to_string()
}

fn default_direction_label() -> String {
    "收/支/其他".to_string()
}

fn default_amount_label() -> String {
    "金额(元)".to_string()
}

fn default_income_label() -> String {
    "收入".to_string()
}

fn default_expense_label() -> String {
    "支出".to_string()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> usize {
    3
}

fn default_scan_rows() -> usize {
    100
}

fn default_extra_labels() -> Vec<String> {
    [
        "交易类型",
        "交易对方",
        "商品",
        "支付方式",
        "当前状态",
        "交易单号",
        "商户单号",
        "备注",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_currency() -> String {
    "¥".to_string()
}

fn default_file_extensions() -> Vec<String> {
    vec!["xlsx".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            columns: ColumnLabels::default(),
            directions: DirectionLabels::default(),
            header_detection: HeaderDetection::default(),
            currency_symbol: default_currency(),
            file_extensions: default_file_extensions(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &StatementPaths) -> Result<Self, StatementError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, StatementError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StatementError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            StatementError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &StatementPaths) -> Result<(), StatementError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            StatementError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| StatementError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Every label that counts towards header detection, required ones first
    pub fn expected_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.columns.required().to_vec();
        for extra in &self.header_detection.extra_labels {
            if !labels.contains(&extra.as_str()) {
                labels.push(extra.as_str());
            }
        }
        labels
    }

    /// Reject settings the normalizer cannot work with
    pub fn validate(&self) -> Result<(), StatementError> {
        for label in self.columns.required() {
            if label.trim().is_empty() {
                return Err(StatementError::Config("Column labels must not be empty".into()));
            }
        }

        if self.directions.income.trim() == self.directions.expense.trim() {
            return Err(StatementError::Config(
                "Income and expense labels must differ".into(),
            ));
        }

        let detection = &self.header_detection;
        if detection.threshold == 0 || detection.threshold > self.expected_labels().len() {
            return Err(StatementError::Config(format!(
                "Header threshold must be between 1 and {}",
                self.expected_labels().len()
            )));
        }

        if detection.scan_rows == 0 {
            return Err(StatementError::Config("scan_rows must be at least 1".into()));
        }

        if self.file_extensions.is_empty() {
            return Err(StatementError::Config(
                "At least one file extension is required".into(),
            ));
        }

        Ok(())
    }
}
