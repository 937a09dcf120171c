// file: src/models/case_record.rs
// description: procedural case record loaded from a record source
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case number (`numero`), the text searched for inside the notices.
    pub case_number: String,

    /// Docket ID (`radicado`), carried through to the report only.
    pub docket_id: String,

    /// Identifier of the row in its source, when the source has one.
    pub source_id: Option<String>,
}

impl CaseRecord {
    pub fn new(case_number: impl Into<String>, docket_id: impl Into<String>) -> Self {
        Self {
            case_number: case_number.into(),
            docket_id: docket_id.into(),
            source_id: None,
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Case numbers that are blank after trimming cannot be searched for.
    /// A blank number would be a substring of every notice, so it is reported
    /// as not found instead of matching every file.
    pub fn has_searchable_number(&self) -> bool {
        !self.case_number.trim().is_empty()
    }
}
