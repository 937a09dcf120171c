// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::documents::MatchMode;
use crate::error::{Result, ReviewError};
use crate::report::ReportMode;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "ESTADOS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub scan: ScanConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub offices_root: Option<PathBuf>,
    #[serde(default)]
    pub offices: Vec<OfficeConfig>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Full connection string. When absent one is built from `cluster`.
    #[serde(default)]
    pub uri: Option<String>,
    pub cluster: String,
    pub app_name: String,
    pub database: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub connect_timeout_secs: u64,
}

// Hand-written so credentials never reach the logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("uri", &self.uri.as_ref().map(|_| "<set>"))
            .field("cluster", &self.cluster)
            .field("app_name", &self.app_name)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connection_uri(&self) -> String {
        match &self.uri {
            Some(uri) => uri.clone(),
            None => format!(
                "mongodb+srv://{}/?retryWrites=true&w=majority&appName={}",
                self.cluster, self.app_name
            ),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) if !user.is_empty() => Some((user, password)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    pub parallel_workers: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub mode: ReportMode,
    #[serde(default)]
    pub write_json: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OfficeConfig {
    pub name: String,
    pub pdf_dir: PathBuf,
    pub revision_dir: PathBuf,
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Mongodb {
        #[serde(default)]
        collection: Option<String>,
    },
    Spreadsheet {
        path: PathBuf,
        #[serde(default)]
        sheet: Option<String>,
    },
}

impl OfficeConfig {
    /// Office laid out as `<root>/<name>/pdf` and `<root>/<name>/revision`.
    pub fn from_layout(root: &Path, name: &str) -> Self {
        let base = root.join(name);
        Self {
            name: name.to_string(),
            pdf_dir: base.join("pdf"),
            revision_dir: base.join("revision"),
            source: None,
        }
    }

    /// Record source for this office; defaults to the collection named after it.
    pub fn source(&self) -> SourceConfig {
        self.source.clone().unwrap_or(SourceConfig::Mongodb { collection: None })
    }

    pub fn collection_name(&self) -> Option<String> {
        match self.source() {
            SourceConfig::Mongodb { collection } => {
                Some(collection.unwrap_or_else(|| self.name.clone()))
            }
            SourceConfig::Spreadsheet { .. } => None,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)));
        }

        Self::build(builder.add_source(environment()))
    }

    /// Built-in defaults with `.env` and `ESTADOS__*` overrides, for runs without a config file.
    pub fn load_defaults() -> Result<Self> {
        dotenv().ok();
        Self::defaults_with(environment())
    }

    fn defaults_with(environment: config::Environment) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        Self::build(
            config::Config::builder()
                .add_source(defaults)
                .add_source(environment),
        )
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .build()
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                uri: None,
                cluster: "clusterestados.iarfl.mongodb.net".to_string(),
                app_name: "ClusterEstados".to_string(),
                database: "dbestados".to_string(),
                username: None,
                password: None,
                connect_timeout_secs: 10,
            },
            scan: ScanConfig {
                parallel_workers: 4,
            },
            matching: MatchingConfig::default(),
            report: ReportConfig::default(),
            offices_root: Some(PathBuf::from(".")),
            offices: vec![],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scan.parallel_workers == 0 {
            return Err(ReviewError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ReviewError::Config(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for office in &self.offices {
            if office.name.trim().is_empty() {
                return Err(ReviewError::Config("office name cannot be empty".to_string()));
            }
            if !seen.insert(office.name.as_str()) {
                return Err(ReviewError::Config(format!(
                    "office {} is configured more than once",
                    office.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
offices_root = "/srv/estados"

[database]
cluster = "cluster.example.net"
app_name = "Estados"
database = "dbestados"
connect_timeout_secs = 5

[scan]
parallel_workers = 2

[matching]
mode = "normalized"

[report]
mode = "append"
write_json = true

[[offices]]
name = "J1PF"
pdf_dir = "/data/J1PF/pdf"
revision_dir = "/data/J1PF/revision"

[[offices]]
name = "J2CMIPIALES"
pdf_dir = "/data/J2CMIPIALES/pdf"
revision_dir = "/data/J2CMIPIALES/revision"
source = { kind = "spreadsheet", path = "/data/estados.xlsx", sheet = "J2CMIPIALES" }
"#;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("estados.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.scan.parallel_workers, 2);
        assert_eq!(config.matching.mode, MatchMode::Normalized);
        assert_eq!(config.report.mode, ReportMode::Append);
        assert!(config.report.write_json);
        assert_eq!(config.offices_root, Some(PathBuf::from("/srv/estados")));
        assert_eq!(config.offices.len(), 2);
        assert_eq!(config.offices[0].collection_name().as_deref(), Some("J1PF"));
        assert_eq!(
            config.offices[1].source(),
            SourceConfig::Spreadsheet {
                path: PathBuf::from("/data/estados.xlsx"),
                sheet: Some("J2CMIPIALES".to_string()),
            }
        );
        assert_eq!(config.offices[1].collection_name(), None);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            &SAMPLE.replace("parallel_workers = 2", "parallel_workers = 0"),
        );

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_defaults_take_environment_overrides() {
        let mut vars = config::Map::new();
        vars.insert("ESTADOS__DATABASE__USERNAME".to_string(), "estados".to_string());
        vars.insert("ESTADOS__DATABASE__PASSWORD".to_string(), "secreto".to_string());
        vars.insert("ESTADOS__SCAN__PARALLEL_WORKERS".to_string(), "8".to_string());

        let config = Config::defaults_with(environment().source(Some(vars))).unwrap();

        assert_eq!(config.database.credentials(), Some(("estados", "secreto")));
        assert_eq!(config.scan.parallel_workers, 8);
        assert_eq!(config.database.database, "dbestados");
        assert_eq!(config.offices_root, Some(PathBuf::from(".")));
        assert_eq!(config.matching.mode, MatchMode::Exact);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = Config::defaults_with(environment().source(Some(config::Map::new()))).unwrap();

        assert_eq!(config.database.credentials(), None);
        assert_eq!(config.scan.parallel_workers, 4);
        assert_eq!(config.report.mode, ReportMode::Batch);
    }

    #[test]
    fn test_rejects_duplicate_offices() {
        let mut config = Config::default_config();
        config.offices = vec![
            OfficeConfig::from_layout(Path::new("/srv"), "J1PF"),
            OfficeConfig::from_layout(Path::new("/srv"), "J1PF"),
        ];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_uri() {
        let mut database = Config::default_config().database;
        assert_eq!(
            database.connection_uri(),
            "mongodb+srv://clusterestados.iarfl.mongodb.net/?retryWrites=true&w=majority&appName=ClusterEstados"
        );

        database.uri = Some("mongodb://localhost:27017".to_string());
        assert_eq!(database.connection_uri(), "mongodb://localhost:27017");
    }

    #[test]
    fn test_credentials_require_user_and_password() {
        let mut database = Config::default_config().database;
        assert!(database.credentials().is_none());

        database.username = Some("clerk".to_string());
        assert!(database.credentials().is_none());

        database.password = Some("secret".to_string());
        assert_eq!(database.credentials(), Some(("clerk", "secret")));

        let debug = format!("{:?}", database);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_office_layout() {
        let office = OfficeConfig::from_layout(Path::new("/srv/estados"), "JPMPUPIALES");
        assert_eq!(office.pdf_dir, PathBuf::from("/srv/estados/JPMPUPIALES/pdf"));
        assert_eq!(
            office.revision_dir,
            PathBuf::from("/srv/estados/JPMPUPIALES/revision")
        );
        assert_eq!(office.collection_name().as_deref(), Some("JPMPUPIALES"));
    }
}
