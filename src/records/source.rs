// file: src/records/source.rs
// description: record source abstraction shared by database and spreadsheet loaders
// reference: internal seam between record loading and the review pipeline

use crate::error::Result;
use crate::models::CaseRecord;
use std::future::Future;

/// Loads every case record of one office, preserving source order.
pub trait RecordSource {
    fn describe(&self) -> String;

    fn fetch_records(&self) -> impl Future<Output = Result<Vec<CaseRecord>>> + Send;
}

/// Numbers stored as floats (`123.0`) come back as integers.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
