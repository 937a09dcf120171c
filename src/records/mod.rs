// file: src/records/mod.rs
// description: record source module exports
// reference: internal module structure

pub mod mongo;
pub mod source;
pub mod spreadsheet;

pub use mongo::{MongoRecordClient, MongoRecordSource};
pub use source::RecordSource;
pub use spreadsheet::SpreadsheetRecordSource;
