// file: src/report/writer.rs
// description: dated plain-text revision report in batch or append mode
// reference: one paragraph per case record, blank line separated

use crate::error::{Result, ReviewError};
use crate::models::MatchResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const REPORT_SUFFIX: &str = "_revision.txt";

/// How a run lands in the dated report file. Never inferred from whether the
/// file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Rewrite the whole file with header and footer.
    #[default]
    Batch,
    /// Append one paragraph per result, creating the file if needed.
    Append,
}

#[derive(Debug, Clone)]
pub struct ReportWriter {
    revision_dir: PathBuf,
    mode: ReportMode,
}

impl ReportWriter {
    pub fn new(revision_dir: impl Into<PathBuf>, mode: ReportMode) -> Self {
        Self {
            revision_dir: revision_dir.into(),
            mode,
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        if !self.revision_dir.exists() {
            fs::create_dir_all(&self.revision_dir).map_err(|source| ReviewError::ReportWrite {
                path: self.revision_dir.clone(),
                source,
            })?;
            info!("Created revision folder {}", self.revision_dir.display());
        }
        Ok(())
    }

    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.revision_dir.join(format!("{}{}", date, REPORT_SUFFIX))
    }

    /// Returns the report path, or `None` when append mode had nothing to write.
    pub fn write(
        &self,
        run_date: NaiveDate,
        results: &[MatchResult],
        unreadable_files: &[String],
    ) -> Result<Option<PathBuf>> {
        self.ensure_dir()?;
        let path = self.report_path(run_date);

        match self.mode {
            ReportMode::Batch => {
                let content = render_batch(run_date, results, unreadable_files);
                fs::write(&path, content).map_err(|source| ReviewError::ReportWrite {
                    path: path.clone(),
                    source,
                })?;
                info!("Wrote {} results to {}", results.len(), path.display());
                Ok(Some(path))
            }
            ReportMode::Append => {
                if results.is_empty() && unreadable_files.is_empty() {
                    warn!("No results to append for {}", run_date);
                    return Ok(None);
                }

                for result in results {
                    append(&path, &format!("{}\n\n", result))?;
                    debug!("Appended result for {}", result.record.case_number);
                }
                if !unreadable_files.is_empty() {
                    append(&path, &render_unreadable(unreadable_files))?;
                }

                info!("Appended {} results to {}", results.len(), path.display());
                Ok(Some(path))
            }
        }
    }

    pub fn read(&self, date: NaiveDate) -> Result<Option<String>> {
        let path = self.report_path(date);
        if !path.exists() {
            warn!("Report not found: {}", path.display());
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Report file names in the revision folder, oldest date first.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.revision_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut reports: Vec<String> = fs::read_dir(&self.revision_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(REPORT_SUFFIX))
            .collect();
        reports.sort();

        Ok(reports)
    }
}

fn append(path: &Path, text: &str) -> Result<()> {
    let failed = |source| ReviewError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(failed)?;
    file.write_all(text.as_bytes()).map_err(failed)
}

pub fn render_batch(run_date: NaiveDate, results: &[MatchResult], unreadable_files: &[String]) -> String {
    let mut content = format!("=== REVISIÓN DEL {} ===\n\n", run_date);

    for result in results {
        content.push_str(&format!("{}\n\n", result));
    }

    if !unreadable_files.is_empty() {
        content.push_str(&render_unreadable(unreadable_files));
    }

    content.push_str(&format!(
        "\n=== FIN DE REVISIÓN - {} estados procesados ===\n",
        results.len()
    ));
    content
}

fn render_unreadable(unreadable_files: &[String]) -> String {
    format!("Archivos no legibles: {}\n\n", unreadable_files.join(", "))
}
