//! Configuration file handling.
//!
//! Settings come from `trip-explorer.toml` (or `--config FILE`); the dataset
//! candidate list is merged from the CLI, the environment, the file and the
//! built-in defaults, in that priority order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::WeekdayLanguage;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "trip-explorer.toml";

/// Environment variable holding extra dataset candidates (OS path-list syntax).
pub const DATA_ENV_VAR: &str = "TRIP_EXPLORER_DATA";

/// Tried after everything configured, relative to the working directory.
pub const DEFAULT_SOURCES: [&str; 2] = [
    "wetaxi_clean_dataset.csv",
    "data/wetaxi_clean_dataset.csv",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset candidates in priority order.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rows kept in the top-city tables.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Maximum points drawn on each map.
    #[serde(default = "default_map_sample_cap")]
    pub map_sample_cap: usize,

    #[serde(default)]
    pub weekday_labels: WeekdayLanguage,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            map_sample_cap: default_map_sample_cap(),
            weekday_labels: WeekdayLanguage::default(),
        }
    }
}

fn default_top_n() -> usize {
    20
}

fn default_map_sample_cap() -> usize {
    5000
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `trip-explorer.toml` from the working directory if it exists.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>, ConfigError> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Dataset candidates: CLI paths, then the environment value, then the
    /// file's `sources`, then [`DEFAULT_SOURCES`]. Duplicates are kept once,
    /// at their first position.
    pub fn candidate_sources(&self, cli: &[PathBuf], env: Option<OsString>) -> Vec<PathBuf> {
        let from_env: Vec<PathBuf> = env
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();

        let mut candidates: Vec<PathBuf> = Vec::new();
        let all = cli
            .iter()
            .cloned()
            .chain(from_env)
            .chain(self.data.sources.iter().cloned())
            .chain(DEFAULT_SOURCES.iter().map(PathBuf::from));
        for path in all {
            if path.as_os_str().is_empty() || candidates.contains(&path) {
                continue;
            }
            candidates.push(path);
        }
        candidates
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config {
            data: DataConfig {
                sources: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
            },
            dashboard: DashboardConfig::default(),
        };
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
