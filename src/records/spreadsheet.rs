// file: src/records/spreadsheet.rs
// description: loads case records from a workbook sheet with a numero/radicado header row
// reference: https://docs.rs/calamine

use super::mongo::{CASE_NUMBER_FIELD, DOCKET_ID_FIELD};
use super::source::{RecordSource, format_number};
use crate::error::{Result, ReviewError};
use crate::models::CaseRecord;
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SpreadsheetRecordSource {
    path: PathBuf,
    sheet: String,
}

impl SpreadsheetRecordSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    pub fn read_records(&self) -> Result<Vec<CaseRecord>> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| ReviewError::Spreadsheet {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|e| ReviewError::Spreadsheet {
                path: self.path.clone(),
                message: format!("sheet {}: {}", self.sheet, e),
            })?;

        let records = records_from_range(&range);
        debug!(
            "Loaded {} records from sheet {} of {}",
            records.len(),
            self.sheet,
            self.path.display()
        );
        Ok(records)
    }
}

impl RecordSource for SpreadsheetRecordSource {
    fn describe(&self) -> String {
        format!("sheet {} of {}", self.sheet, self.path.display())
    }

    async fn fetch_records(&self) -> Result<Vec<CaseRecord>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.read_records())
            .await
            .map_err(|e| ReviewError::Setup(format!("Spreadsheet reading task failed: {}", e)))?
    }
}

/// The first row is the header; `numero` and `radicado` are located by name.
pub fn records_from_range(range: &Range<Data>) -> Vec<CaseRecord> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|cell| cell_to_text(cell).trim().eq_ignore_ascii_case(name))
    };
    let number_col = column(CASE_NUMBER_FIELD);
    let docket_col = column(DOCKET_ID_FIELD);

    if number_col.is_none() {
        warn!("Sheet has no '{}' column; case numbers will be empty", CASE_NUMBER_FIELD);
    }
    if docket_col.is_none() {
        warn!("Sheet has no '{}' column; docket IDs will be empty", DOCKET_ID_FIELD);
    }

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    rows.enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|(index, row)| {
            let value = |col: Option<usize>| {
                col.and_then(|c| row.get(c))
                    .map(cell_to_text)
                    .unwrap_or_default()
            };
            // header occupies the first row; rows are reported 1-based
            let sheet_row = first_row + index + 2;

            CaseRecord {
                case_number: value(number_col),
                docket_id: value(docket_col),
                source_id: Some(sheet_row.to_string()),
            }
        })
        .collect()
}

fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_records_from_range() {
        let range = sheet(&[
            &[text("radicado"), text("Numero")],
            &[text("D1"), text("123-A")],
            &[text("D2"), Data::Float(456.0)],
        ]);

        let records = records_from_range(&range);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], CaseRecord::new("123-A", "D1").with_source_id("2"));
        assert_eq!(records[1], CaseRecord::new("456", "D2").with_source_id("3"));
    }

    #[test]
    fn test_missing_column_and_blank_rows() {
        let range = sheet(&[
            &[text("numero"), text("observaciones")],
            &[text("123-A"), Data::Empty],
            &[Data::Empty, Data::Empty],
            &[Data::Int(77), text("urgente")],
        ]);

        let records = records_from_range(&range);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].docket_id, "");
        assert_eq!(records[1].case_number, "77");
        assert_eq!(records[1].source_id.as_deref(), Some("4"));
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(records_from_range(&range).is_empty());
    }

    #[test]
    fn test_unreadable_workbook_is_setup_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("estados.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let source = SpreadsheetRecordSource::new(&path, "J2CMIPIALES");
        let err = tokio_test::block_on(source.fetch_records()).unwrap_err();

        assert!(err.is_setup());
        assert!(err.to_string().contains("estados.xlsx"));
    }
}
