// file: src/pipeline/offices.rs
// description: court office registry built from explicit config and folder discovery
// reference: https://docs.rs/walkdir

use crate::config::{Config, OfficeConfig, SourceConfig};
use crate::error::{Result, ReviewError};
use crate::utils::Validator;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct OfficeRegistry {
    offices: Vec<OfficeConfig>,
}

impl OfficeRegistry {
    /// Discovered offices first, then explicit entries replacing any of the same name.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut by_name = BTreeMap::new();

        if let Some(root) = &config.offices_root {
            for office in Self::discover(root)? {
                by_name.insert(office.name.clone(), office);
            }
        }

        for office in &config.offices {
            if by_name.insert(office.name.clone(), office.clone()).is_some() {
                debug!("Configured office {} overrides discovered folder", office.name);
            }
        }

        Self::from_offices(by_name.into_values().collect())
    }

    pub fn from_offices(mut offices: Vec<OfficeConfig>) -> Result<Self> {
        for office in &offices {
            Validator::validate_office_name(&office.name)?;
        }
        offices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { offices })
    }

    /// Every immediate subfolder of `root` holding a `pdf` folder is an office.
    pub fn discover(root: &Path) -> Result<Vec<OfficeConfig>> {
        Validator::validate_directory(root)?;

        let offices: Vec<OfficeConfig> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| entry.path().join("pdf").is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                (!name.starts_with('.')).then(|| OfficeConfig::from_layout(root, &name))
            })
            .collect();

        info!("Discovered {} offices under {}", offices.len(), root.display());
        Ok(offices)
    }

    pub fn offices(&self) -> &[OfficeConfig] {
        &self.offices
    }

    pub fn names(&self) -> Vec<&str> {
        self.offices.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&OfficeConfig> {
        self.offices
            .iter()
            .find(|office| office.name == name)
            .ok_or_else(|| {
                ReviewError::Setup(format!(
                    "Unknown office {} (available: {})",
                    name,
                    self.names().join(", ")
                ))
            })
    }

    /// One named office, or all of them.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&OfficeConfig>> {
        match name {
            Some(name) => Ok(vec![self.get(name)?]),
            None if self.offices.is_empty() => {
                Err(ReviewError::Setup("No offices configured".to_string()))
            }
            None => Ok(self.offices.iter().collect()),
        }
    }
}

/// Whether any of `offices` reads its records from the database.
pub fn needs_database(offices: &[&OfficeConfig]) -> bool {
    offices
        .iter()
        .any(|office| matches!(office.source(), SourceConfig::Mongodb { .. }))
}
