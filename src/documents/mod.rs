// file: src/documents/mod.rs
// description: notice pdf scanning, extraction and matching module exports
// reference: internal module structure

pub mod corpus;
pub mod extractor;
pub mod matcher;
pub mod scanner;

pub use corpus::{DocumentCorpus, DocumentText, ScannedDocument};
pub use extractor::{LopdfExtractor, TextExtractor};
pub use matcher::{MatchMode, TextMatcher};
pub use scanner::{PdfScanner, ScannedFile};
