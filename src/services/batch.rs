//! Batch processing of statement sources
//!
//! Sources are processed one at a time, in path order. The first
//! source-level failure aborts the whole batch and nothing is merged.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{StatementError, StatementResult};
use crate::reports::AggregateReport;
use crate::services::normalize::{NormalizeStats, RowNormalizer};
use crate::sources::load_grid;

/// What happened to a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub path: PathBuf,
    /// Zero-based header row within the source grid
    pub header_row: usize,
    pub stats: NormalizeStats,
}

/// Result of a successful batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Merged report over all sources
    pub report: AggregateReport,
    /// One entry per source, in processing order
    pub sources: Vec<SourceSummary>,
}

impl BatchOutcome {
    /// Row counts summed over every source
    pub fn total_stats(&self) -> NormalizeStats {
        let mut total = NormalizeStats::default();
        for source in &self.sources {
            total.absorb(&source.stats);
        }
        total
    }
}

/// List statement files directly inside a directory
///
/// Matches extensions case-insensitively, skips subdirectories and Office
/// lock files (`~$name.xlsx`), and sorts by path. An empty result is an
/// error rather than an empty list.
pub fn discover_sources(dir: &Path, extensions: &[String]) -> StatementResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(StatementError::SourceNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || is_lock_file(&path) || !has_extension(&path, extensions) {
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(StatementError::NoFilesFound(dir.to_path_buf()));
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered sources");
    Ok(files)
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Expand command-line inputs into a flat list of source files
///
/// Directories are scanned with `discover_sources`; anything else is taken
/// as a file path and checked when it is processed.
pub fn collect_inputs(inputs: &[PathBuf], extensions: &[String]) -> StatementResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(discover_sources(input, extensions)?);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Runs the load → normalize → aggregate pipeline over many sources
pub struct BatchRunner<'a> {
    settings: &'a Settings,
}

impl<'a> BatchRunner<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Process a single source into its own report
    pub fn process_source(&self, path: &Path) -> StatementResult<(AggregateReport, SourceSummary)> {
        let grid = load_grid(path)?;
        let normalized = RowNormalizer::new(self.settings).normalize(&grid)?;
        let report = AggregateReport::from_records(&normalized.records);

        Ok((
            report,
            SourceSummary {
                path: path.to_path_buf(),
                header_row: normalized.header_row,
                stats: normalized.stats,
            },
        ))
    }

    /// Process every source in order, then merge
    ///
    /// `progress` is called after each source with the number completed so
    /// far, the total, and the path just finished. Any source error stops
    /// the batch and is returned tagged with the failing path.
    pub fn run<F>(&self, sources: &[PathBuf], mut progress: F) -> StatementResult<BatchOutcome>
    where
        F: FnMut(usize, usize, &Path),
    {
        let total = sources.len();
        let mut reports = Vec::with_capacity(total);
        let mut summaries = Vec::with_capacity(total);

        for (index, path) in sources.iter().enumerate() {
            let (report, summary) = self
                .process_source(path)
                .map_err(|e| StatementError::in_source(path, e))?;

            info!(
                path = %path.display(),
                records = summary.stats.records,
                dropped = summary.stats.dropped(),
                "processed source"
            );

            reports.push(report);
            summaries.push(summary);
            progress(index + 1, total, path);
        }

        Ok(BatchOutcome {
            report: AggregateReport::merge(&reports),
            sources: summaries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MonthKey};
    use tempfile::TempDir;

    const HEADER: &str = "交易时间,收/支/其他,金额(元),交易类型,交易对方\n";

    fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from("微信支付账单明细\n起始时间,2024-01-01\n");
        content.push_str(HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn csv_settings() -> Settings {
        Settings {
            file_extensions: vec!["csv".to_string()],
            ..Settings::default()
        }
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("b.XLSX"), "").unwrap();
        std::fs::write(dir.join("a.xlsx"), "").unwrap();
        std::fs::write(dir.join("~$a.xlsx"), "").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.join("nested.xlsx")).unwrap();

        let files = discover_sources(dir, &["xlsx".to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.XLSX"]);
    }

    #[test]
    fn test_discover_empty_dir_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("readme.md"), "").unwrap();

        let result = discover_sources(temp_dir.path(), &["xlsx".to_string()]);
        assert!(matches!(result, Err(StatementError::NoFilesFound(_))));
    }

    #[test]
    fn test_run_merges_sources() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_csv(
            dir,
            "jan.csv",
            &[
                "2024-01-05 10:00:00,收入,100.00,转账,A",
                "2024-01-20 10:00:00,支出,30.00,商户消费,B",
            ],
        );
        write_csv(
            dir,
            "feb.csv",
            &[
                "2024-01-31 23:59:59,支出,10.00,商户消费,C",
                "2024-02-01 00:00:00,收入,5.50,转账,D",
                "2024-02-02 00:00:00,其他,999,转账,E",
            ],
        );

        let settings = csv_settings();
        let files = collect_inputs(&[dir.to_path_buf()], &settings.file_extensions).unwrap();
        let mut calls = Vec::new();
        let outcome = BatchRunner::new(&settings)
            .run(&files, |done, total, _| calls.push((done, total)))
            .unwrap();

        assert_eq!(calls, vec![(1, 2), (2, 2)]);
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(outcome.sources[0].header_row, 2);

        let jan = outcome.report.month(MonthKey::new(2024, 1).unwrap()).unwrap();
        assert_eq!(jan.income, Money::from_cents(10000));
        assert_eq!(jan.expense, Money::from_cents(4000));
        let feb = outcome.report.month(MonthKey::new(2024, 2).unwrap()).unwrap();
        assert_eq!(feb.income, Money::from_cents(550));
        assert_eq!(outcome.total_stats().dropped_direction, 1);
    }

    #[test]
    fn test_first_failure_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let good = write_csv(dir, "a.csv", &["2024-01-05 10:00:00,收入,1.00,转账,A"]);
        let bad = dir.join("b.csv");
        std::fs::write(&bad, "交易时间,收/支/其他,交易类型\n2024-01-05,收入,转账\n").unwrap();
        let never = write_csv(dir, "c.csv", &["2024-01-05 10:00:00,收入,1.00,转账,A"]);

        let settings = csv_settings();
        let mut seen = Vec::new();
        let err = BatchRunner::new(&settings)
            .run(&[good, bad.clone(), never], |_, _, path| {
                seen.push(path.to_path_buf())
            })
            .unwrap_err();

        assert_eq!(seen.len(), 1);
        assert!(err.is_schema());
        match err {
            StatementError::InSource { path, .. } => assert_eq!(path, bad.display().to_string()),
            other => panic!("expected InSource, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_in_list() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.xlsx");
        let settings = Settings::default();

        let err = BatchRunner::new(&settings)
            .run(&[missing], |_, _, _| {})
            .unwrap_err();
        assert!(matches!(err.root_cause(), StatementError::SourceNotFound(_)));
    }
}
