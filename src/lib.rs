// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod documents;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod utils;

pub use config::{Config, DatabaseConfig, OfficeConfig, SourceConfig};
pub use documents::{DocumentCorpus, LopdfExtractor, MatchMode, PdfScanner, TextMatcher};
pub use error::{Result, ReviewError};
pub use models::{CaseRecord, MatchResult};
pub use pipeline::{
    OfficeRegistry, OfficeReview, ProgressTracker, ReviewOptions, ReviewStats, ReviewSummary,
    RunOutcome,
};
pub use records::{MongoRecordClient, RecordSource, SpreadsheetRecordSource};
pub use report::{JsonExporter, ReportMode, ReportWriter};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let options = ReviewOptions::from_config(&config);
        assert_eq!(options.report_mode, ReportMode::Batch);
        assert_eq!(options.match_mode, MatchMode::Exact);
    }
}
