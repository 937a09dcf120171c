// file: src/documents/scanner.rs
// description: notice folder listing with pdf filtering
// reference: https://docs.rs/walkdir

use crate::error::Result;
use crate::utils::Validator;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct PdfScanner {
    root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl PdfScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Lists the folder's PDFs, sorted by file name. Subfolders are not visited.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(&self.root)?;
        info!("Scanning directory: {}", self.root.display());

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !is_pdf(&file_name) {
                debug!("Skipping non-pdf file: {}", file_name);
                continue;
            }

            files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                file_name,
            });
        }

        info!("Found {} pdf files", files.len());
        Ok(files)
    }
}

pub fn is_pdf(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.pdf"), "x").unwrap();
        fs::write(temp.path().join("A.PDF"), "x").unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("c.pdf"), "x").unwrap();

        let scanner = PdfScanner::new(temp.path());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
        assert_eq!(files[1].path, temp.path().join("b.pdf"));
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let scanner = PdfScanner::new(temp.path().join("pdf"));

        let err = scanner.scan().unwrap_err();
        assert!(err.is_setup());
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("estado.pdf"));
        assert!(is_pdf("ESTADO.Pdf"));
        assert!(!is_pdf("estado.pdf.txt"));
        assert!(!is_pdf("estado"));
    }
}
