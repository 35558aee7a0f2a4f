//! Configuration for material-intensity

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::IntensityError;
use crate::method::DEFAULT_METHOD_NAME;
use crate::rules::MatchPolicy;

/// Folder name the host application keeps its data under
pub const DEFAULT_SENTINEL: &str = "openLCA-data-1.4";

/// Where data-root discovery starts
pub fn default_discovery_start() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inventory database name, also used in the artifact folder name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Explicit database file; defaults to `<data_root>/databases/<database_name>.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Host data folder; discovered from `discovery_start` when absent
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    #[serde(default = "default_discovery_start")]
    pub discovery_start: PathBuf,

    /// Folder name marking the data root
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Diagnostic categories, external-data flags and CSV reports
    #[serde(default)]
    pub analysis: bool,

    /// Import the zipped method back into the database
    #[serde(default = "default_true")]
    pub import: bool,

    #[serde(default)]
    pub match_policy: MatchPolicy,

    #[serde(default = "default_method_name")]
    pub method_name: String,
}

fn default_database_name() -> String {
    "ecoinvent_391_cutoff".to_string()
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_method_name() -> String {
    DEFAULT_METHOD_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
            database_path: None,
            data_root: None,
            discovery_start: default_discovery_start(),
            sentinel: default_sentinel(),
            analysis: false,
            import: true,
            match_policy: MatchPolicy::default(),
            method_name: default_method_name(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IntensityError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| IntensityError::Config(e.to_string()))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IntensityError> {
        let content = toml::to_string_pretty(self).map_err(|e| IntensityError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Database file under a resolved data root
    pub fn database_file(&self, data_root: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_root.join("databases").join(format!("{}.db", self.database_name)))
    }
}
