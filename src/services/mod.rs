//! Service layer for statement-summary
//!
//! The service layer turns raw sources into reports: row normalization,
//! batch processing over many files, and document conversion.

pub mod batch;
pub mod convert;
pub mod normalize;

pub use batch::{collect_inputs, discover_sources, BatchOutcome, BatchRunner, SourceSummary};
pub use convert::{convert_tables, default_output_path, ConversionOutcome, TABLES_SHEET};
pub use normalize::{NormalizeStats, NormalizedSource, RowNormalizer};
