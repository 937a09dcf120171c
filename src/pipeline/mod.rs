// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod offices;
mod orchestrator;
mod progress;

pub use offices::{OfficeRegistry, needs_database};
pub use orchestrator::{
    OfficeReview, ReviewOptions, ReviewSummary, RunOutcome, match_records, review_office,
    review_offices,
};
pub use progress::{ProgressTracker, ReviewStats};
