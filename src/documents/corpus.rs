// file: src/documents/corpus.rs
// description: per-run in-memory text of every notice pdf, searched once per record
// reference: bounded parallel extraction merged back into listing order

use super::extractor::TextExtractor;
use super::matcher::TextMatcher;
use super::scanner::ScannedFile;
use crate::pipeline::ProgressTracker;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentText {
    Readable(String),
    /// Extraction failed; the reason is kept for the logs and the report.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument {
    pub file_name: String,
    pub text: DocumentText,
}

impl ScannedDocument {
    pub fn readable(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: DocumentText::Readable(text.into()),
        }
    }

    pub fn unreadable(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: DocumentText::Unreadable(reason.into()),
        }
    }
}

pub struct DocumentCorpus {
    documents: Vec<ScannedDocument>,
    matcher: TextMatcher,
}

impl DocumentCorpus {
    /// Extracts every file once, at most `workers` at a time. Documents keep
    /// the order of `files` whatever order extraction finishes in.
    pub async fn build(
        files: Vec<ScannedFile>,
        extractor: Arc<dyn TextExtractor>,
        matcher: TextMatcher,
        workers: usize,
        progress: Arc<ProgressTracker>,
    ) -> Self {
        let documents = stream::iter(files.into_iter().map(|file| {
            let extractor = Arc::clone(&extractor);
            let progress = Arc::clone(&progress);

            async move {
                let path = file.path.clone();
                let extracted =
                    tokio::task::spawn_blocking(move || extractor.extract_text(&path)).await;

                match extracted {
                    Ok(Ok(text)) => {
                        debug!("Extracted {} characters from {}", text.len(), file.file_name);
                        progress.inc_documents_read();
                        ScannedDocument::readable(file.file_name, text)
                    }
                    Ok(Err(e)) => {
                        warn!("Skipping unreadable pdf {}: {}", file.file_name, e);
                        progress.inc_documents_unreadable();
                        ScannedDocument::unreadable(file.file_name, e.to_string())
                    }
                    Err(e) => {
                        warn!("Extraction task for {} failed: {}", file.file_name, e);
                        progress.inc_documents_unreadable();
                        ScannedDocument::unreadable(file.file_name, e.to_string())
                    }
                }
            }
        }))
        .buffered(workers.max(1))
        .collect::<Vec<_>>()
        .await;

        Self::from_documents(documents, matcher)
    }

    pub fn from_documents(documents: Vec<ScannedDocument>, matcher: TextMatcher) -> Self {
        let documents = documents
            .into_iter()
            .map(|document| match document.text {
                DocumentText::Readable(text) => ScannedDocument {
                    file_name: document.file_name,
                    text: DocumentText::Readable(matcher.prepare(text)),
                },
                unreadable => ScannedDocument {
                    file_name: document.file_name,
                    text: unreadable,
                },
            })
            .collect();

        Self { documents, matcher }
    }

    /// Names of the readable documents containing `needle`, in corpus order.
    pub fn find(&self, needle: &str) -> Vec<String> {
        self.documents
            .iter()
            .filter_map(|document| match &document.text {
                DocumentText::Readable(text) if self.matcher.contains(text, needle) => {
                    Some(document.file_name.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn unreadable_files(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter(|document| matches!(document.text, DocumentText::Unreadable(_)))
            .map(|document| document.file_name.clone())
            .collect()
    }

    pub fn documents(&self) -> &[ScannedDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::MatchMode;
    use crate::error::{Result, ReviewError};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// Reads the file name as text; names starting with "corrupt" fail and
    /// "slow" names sleep so completion order differs from listing order.
    struct FakeExtractor;

    impl TextExtractor for FakeExtractor {
        fn extract_text(&self, path: &Path) -> Result<String> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("corrupt") {
                return Err(ReviewError::Extraction {
                    file: name,
                    message: "bad xref".to_string(),
                });
            }
            if name.starts_with("slow") {
                std::thread::sleep(Duration::from_millis(50));
            }
            Ok(format!("Texto de {}", name))
        }
    }

    fn scanned(name: &str) -> ScannedFile {
        ScannedFile {
            path: PathBuf::from("/notices").join(name),
            file_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_keeps_listing_order() {
        let files = vec![scanned("slow_a.pdf"), scanned("b.pdf"), scanned("corrupt.pdf"), scanned("c.pdf")];
        let progress = Arc::new(ProgressTracker::hidden());

        let corpus = DocumentCorpus::build(
            files,
            Arc::new(FakeExtractor),
            TextMatcher::new(MatchMode::Exact),
            4,
            Arc::clone(&progress),
        )
        .await;

        let names: Vec<_> = corpus.documents().iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["slow_a.pdf", "b.pdf", "corrupt.pdf", "c.pdf"]);
        assert_eq!(corpus.unreadable_files(), vec!["corrupt.pdf".to_string()]);

        let stats = progress.get_stats();
        assert_eq!(stats.documents_read, 3);
        assert_eq!(stats.documents_unreadable, 1);
    }

    #[tokio::test]
    async fn test_build_is_deterministic() {
        let files = vec![scanned("slow_a.pdf"), scanned("b.pdf"), scanned("slow_c.pdf")];
        let build = |workers| {
            DocumentCorpus::build(
                files.clone(),
                Arc::new(FakeExtractor),
                TextMatcher::default(),
                workers,
                Arc::new(ProgressTracker::hidden()),
            )
        };

        let parallel = build(3).await;
        let sequential = build(1).await;

        assert_eq!(parallel.documents(), sequential.documents());
        assert_eq!(parallel.find(".pdf"), sequential.find(".pdf"));
    }

    #[test]
    fn test_find_skips_unreadable() {
        let corpus = DocumentCorpus::from_documents(
            vec![
                ScannedDocument::readable("a.pdf", "Case 123-A"),
                ScannedDocument::unreadable("corrupt.pdf", "Case 123-A"),
                ScannedDocument::readable("b.pdf", "Case 999-B and 123-A"),
            ],
            TextMatcher::default(),
        );

        assert_eq!(corpus.find("123-A"), vec!["a.pdf".to_string(), "b.pdf".to_string()]);
        assert_eq!(corpus.find("999-B"), vec!["b.pdf".to_string()]);
        assert!(corpus.find("000-X").is_empty());
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_normalized_corpus() {
        let corpus = DocumentCorpus::from_documents(
            vec![ScannedDocument::readable("a.pdf", "RADICADO\n2023  00123")],
            TextMatcher::new(MatchMode::Normalized),
        );

        assert_eq!(corpus.find("2023 00123"), vec!["a.pdf".to_string()]);
        assert_eq!(corpus.find("radicado 2023"), vec!["a.pdf".to_string()]);
    }
}
