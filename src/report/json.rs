// file: src/report/json.rs
// description: json export of a review run next to the text report

use crate::error::{Result, ReviewError};
use crate::models::MatchResult;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedReview<'a> {
    pub office: &'a str,
    pub run_date: NaiveDate,
    pub exported_at: String,
    pub total_records: usize,
    pub records_found: usize,
    pub unreadable_files: &'a [String],
    pub results: &'a [MatchResult],
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn export_path(&self, run_date: NaiveDate) -> PathBuf {
        self.output_dir.join(format!("{}_revision.json", run_date))
    }

    pub fn export(
        &self,
        office: &str,
        run_date: NaiveDate,
        results: &[MatchResult],
        unreadable_files: &[String],
        pretty: bool,
    ) -> Result<PathBuf> {
        let review = ExportedReview {
            office,
            run_date,
            exported_at: Utc::now().to_rfc3339(),
            total_records: results.len(),
            records_found: results.iter().filter(|r| r.found()).count(),
            unreadable_files,
            results,
        };

        let json = if pretty {
            serde_json::to_string_pretty(&review)?
        } else {
            serde_json::to_string(&review)?
        };

        let path = self.export_path(run_date);
        fs::create_dir_all(&self.output_dir)
            .and_then(|_| fs::write(&path, json))
            .map_err(|source| ReviewError::ReportWrite {
                path: path.clone(),
                source,
            })?;

        info!("Exported {} results to {}", results.len(), path.display());
        Ok(path)
    }
}
