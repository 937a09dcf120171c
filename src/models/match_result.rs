// file: src/models/match_result.rs
// description: per-record outcome of scanning the notice folder
// reference: rendered as one paragraph of the revision report

use super::CaseRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub record: CaseRecord,

    /// File names containing the case number, in folder listing order.
    pub matched_files: Vec<String>,

    pub run_date: NaiveDate,
}

impl MatchResult {
    pub fn new(record: CaseRecord, matched_files: Vec<String>, run_date: NaiveDate) -> Self {
        Self {
            record,
            matched_files,
            run_date,
        }
    }

    pub fn found(&self) -> bool {
        !self.matched_files.is_empty()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found() {
            write!(
                f,
                "Se encontró el número {} con radicado {} en los archivos: {}",
                self.record.case_number,
                self.record.docket_id,
                self.matched_files.join(", ")
            )
        } else {
            write!(
                f,
                "No se encontró el número {} con radicado {} en ningún archivo.",
                self.record.case_number, self.record.docket_id
            )
        }
    }
}
