// file: src/pipeline/orchestrator.rs
// description: coordinates record loading, notice scanning and report writing per office
// reference: orchestrates the review of one or many court offices

use crate::config::{Config, OfficeConfig, SourceConfig};
use crate::documents::{
    DocumentCorpus, LopdfExtractor, MatchMode, PdfScanner, ScannedFile, TextExtractor, TextMatcher,
};
use crate::error::{Result, ReviewError};
use crate::models::{CaseRecord, MatchResult};
use crate::pipeline::progress::{ProgressTracker, ReviewStats};
use crate::records::{MongoRecordClient, RecordSource, SpreadsheetRecordSource};
use crate::report::{JsonExporter, ReportMode, ReportWriter};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub match_mode: MatchMode,
    pub report_mode: ReportMode,
    pub write_json: bool,
    pub parallel_workers: usize,
    pub show_progress: bool,
    pub colored: bool,
}

impl ReviewOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            match_mode: config.matching.mode,
            report_mode: config.report.mode,
            write_json: config.report.write_json,
            parallel_workers: config.scan.parallel_workers,
            show_progress: true,
            colored: true,
        }
    }
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            report_mode: ReportMode::default(),
            write_json: false,
            parallel_workers: 4,
            show_progress: false,
            colored: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub office: String,
    pub run_date: NaiveDate,
    pub total_records: usize,
    pub records_found: usize,
    pub unreadable_files: Vec<String>,
    pub report_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub stats: ReviewStats,
}

impl ReviewSummary {
    pub fn found_rate(&self) -> f64 {
        self.stats.found_rate()
    }
}

pub struct OfficeReview {
    office: OfficeConfig,
    options: ReviewOptions,
    extractor: Arc<dyn TextExtractor>,
}

impl OfficeReview {
    pub fn new(office: OfficeConfig, options: ReviewOptions) -> Self {
        Self {
            office,
            options,
            extractor: Arc::new(LopdfExtractor),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn office(&self) -> &OfficeConfig {
        &self.office
    }

    /// Checks the pdf folder, creates the revision folder, and lists the notices.
    pub fn validate_structure(&self) -> Result<Vec<ScannedFile>> {
        let files = PdfScanner::new(&self.office.pdf_dir).scan().map_err(|e| {
            ReviewError::Setup(format!("Invalid structure for {}: {}", self.office.name, e))
        })?;

        self.writer().ensure_dir()?;

        if files.is_empty() {
            warn!(
                "No pdf files found in {}; every record will be reported as not found",
                self.office.pdf_dir.display()
            );
        }

        info!("Valid structure for {}", self.office.name);
        Ok(files)
    }

    pub async fn run<S: RecordSource>(&self, source: &S, run_date: NaiveDate) -> Result<ReviewSummary> {
        info!("Starting review for {} ({})", self.office.name, run_date);

        let files = self.validate_structure()?;

        let records = source.fetch_records().await?;
        info!("Loaded {} records from {}", records.len(), source.describe());
        if records.is_empty() {
            warn!("No records to review for {}", self.office.name);
        }

        let progress = Arc::new(if self.options.show_progress {
            ProgressTracker::with_color(files.len(), self.options.colored)
        } else {
            ProgressTracker::hidden()
        });

        let corpus = DocumentCorpus::build(
            files,
            Arc::clone(&self.extractor),
            TextMatcher::new(self.options.match_mode),
            self.options.parallel_workers,
            Arc::clone(&progress),
        )
        .await;
        progress.finish();

        let results = match_records(&corpus, records, run_date, &progress);
        let unreadable_files = corpus.unreadable_files();

        let report_path = self.writer().write(run_date, &results, &unreadable_files)?;

        let json_path = if self.options.write_json {
            Some(JsonExporter::new(&self.office.revision_dir).export(
                &self.office.name,
                run_date,
                &results,
                &unreadable_files,
                true,
            )?)
        } else {
            None
        };

        let stats = progress.get_stats();
        let summary = ReviewSummary {
            office: self.office.name.clone(),
            run_date,
            total_records: results.len(),
            records_found: stats.records_found,
            unreadable_files,
            report_path,
            json_path,
            stats,
        };

        log_summary(&summary, &results);
        Ok(summary)
    }

    fn writer(&self) -> ReportWriter {
        ReportWriter::new(&self.office.revision_dir, self.options.report_mode)
    }
}

/// One result per record, in record order. Duplicate case numbers each get their own.
pub fn match_records(
    corpus: &DocumentCorpus,
    records: Vec<CaseRecord>,
    run_date: NaiveDate,
    progress: &ProgressTracker,
) -> Vec<MatchResult> {
    records
        .into_iter()
        .map(|record| {
            if !record.has_searchable_number() {
                warn!(
                    "Record with docket {} has an empty case number",
                    record.docket_id
                );
            }

            let matched_files = corpus.find(&record.case_number);
            debug!(
                "Processed case {}: {} files",
                record.case_number,
                matched_files.len()
            );
            progress.record_result(!matched_files.is_empty());

            MatchResult::new(record, matched_files, run_date)
        })
        .collect()
}

fn log_summary(summary: &ReviewSummary, results: &[MatchResult]) {
    info!(
        "Read {} pdf files in {}s ({:.1} files/s)",
        summary.stats.documents_read + summary.stats.documents_unreadable,
        summary.stats.duration_secs,
        summary.stats.documents_per_second()
    );
    info!(
        "Review complete for {}: {}/{} records found ({:.1}%)",
        summary.office,
        summary.records_found,
        summary.total_records,
        summary.found_rate()
    );

    if summary.records_found > 0 {
        info!("Records found in notices:");
        for result in results.iter().filter(|r| r.found()) {
            info!(
                "  {} ({}) -> {}",
                result.record.case_number,
                result.record.docket_id,
                result.matched_files.join(", ")
            );
        }
    } else {
        info!("No records were found in the pdf files");
    }

    if !summary.unreadable_files.is_empty() {
        warn!(
            "{} pdf files could not be read: {}",
            summary.unreadable_files.len(),
            summary.unreadable_files.join(", ")
        );
    }
}

/// Reviews one office with the record source its configuration names.
pub async fn review_office(
    office: &OfficeConfig,
    options: &ReviewOptions,
    database: Option<&MongoRecordClient>,
    run_date: NaiveDate,
) -> Result<ReviewSummary> {
    let review = OfficeReview::new(office.clone(), options.clone());

    match office.source() {
        SourceConfig::Mongodb { collection } => {
            let database = database.ok_or_else(|| {
                ReviewError::Setup(format!("No database connection for office {}", office.name))
            })?;
            let collection = collection.unwrap_or_else(|| office.name.clone());
            review.run(&database.source(&collection), run_date).await
        }
        SourceConfig::Spreadsheet { path, sheet } => {
            let sheet = sheet.unwrap_or_else(|| office.name.clone());
            review
                .run(&SpreadsheetRecordSource::new(path, sheet), run_date)
                .await
        }
    }
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub summaries: Vec<ReviewSummary>,
    pub failures: Vec<(String, ReviewError)>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reviews each office in turn. A failing office is logged and skipped.
pub async fn review_offices(
    offices: &[&OfficeConfig],
    options: &ReviewOptions,
    database: Option<&MongoRecordClient>,
    run_date: NaiveDate,
) -> RunOutcome {
    info!("Processing {} offices", offices.len());
    let mut outcome = RunOutcome::default();

    for office in offices {
        match review_office(office, options, database, run_date).await {
            Ok(summary) => outcome.summaries.push(summary),
            Err(e) => {
                error!("Error processing {}: {}", office.name, e);
                outcome.failures.push((office.name.clone(), e));
            }
        }
    }

    info!(
        "Processing complete: {} succeeded, {} failed",
        outcome.summaries.len(),
        outcome.failures.len()
    );
    outcome
}
