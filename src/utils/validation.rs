// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, ReviewError};
use chrono::NaiveDate;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ReviewError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(ReviewError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Office names double as folder and collection names.
    pub fn validate_office_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ReviewError::Validation(
                "Office name cannot be empty".to_string(),
            ));
        }

        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ReviewError::Validation(format!(
                "Invalid office name: {}",
                name
            )));
        }

        Ok(())
    }

    pub fn parse_run_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
            ReviewError::Validation(format!(
                "Invalid date {} (expected YYYY-MM-DD): {}",
                value, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("estado.pdf");
        fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_office_name() {
        assert!(Validator::validate_office_name("JPMGUACHUCAL").is_ok());
        assert!(Validator::validate_office_name("").is_err());
        assert!(Validator::validate_office_name("  ").is_err());
        assert!(Validator::validate_office_name("../J1PF").is_err());
        assert!(Validator::validate_office_name("..").is_err());
    }

    #[test]
    fn test_parse_run_date() {
        assert_eq!(
            Validator::parse_run_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(Validator::parse_run_date("15/03/2024").is_err());
    }
}
