// file: src/report/mod.rs
// description: revision report module exports
// reference: internal module structure

pub mod json;
pub mod writer;

pub use json::{ExportedReview, JsonExporter};
pub use writer::{REPORT_SUFFIX, ReportMode, ReportWriter};
