//! Path management for statement-summary
//!
//! ## Path Resolution Order
//!
//! 1. `STATEMENT_SUMMARY_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/statement-summary` on Linux,
//!    `~/Library/Application Support/statement-summary` on macOS,
//!    `%APPDATA%\statement-summary` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::StatementError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "STATEMENT_SUMMARY_DIR";

/// Manages all paths used by statement-summary
#[derive(Debug, Clone)]
pub struct StatementPaths {
    base_dir: PathBuf,
}

impl StatementPaths {
    /// Create a new StatementPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, StatementError> {
        let base_dir = if let Ok(custom) = std::env::var(BASE_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create StatementPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), StatementError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| StatementError::Io(format!("Failed to create base directory: {}", e)))?;
        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, StatementError> {
    ProjectDirs::from("", "", "statement-summary")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| StatementError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StatementPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(BASE_DIR_ENV, custom_path);
        let paths = StatementPaths::new().unwrap();
        env::remove_var(BASE_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StatementPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
    }
}
