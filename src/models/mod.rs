// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod case_record;
pub mod match_result;

pub use case_record::CaseRecord;
pub use match_result::MatchResult;
