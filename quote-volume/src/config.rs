//! Run configuration.
//!
//! Everything the loader and reports need from the environment lives here
//! so no path or token is hard-coded in the processing code. Values come
//! from a TOML file (see `config/default.toml`) and can be overridden by
//! CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{DEFAULT_FILE_PREFIX, DEFAULT_MARKER};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings for one summary run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Directory holding the quote files.
    pub data_dir: PathBuf,

    /// Name prefix of quote files.
    pub file_prefix: String,

    /// Marker token used by the line eligibility filter.
    pub marker: String,

    /// Leave out files that fail to parse instead of aborting.
    pub skip_invalid_files: bool,

    /// Where the text summary is written.
    pub table_output: PathBuf,

    /// Where the plot series is written.
    pub series_output: PathBuf,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            skip_invalid_files: false,
            table_output: PathBuf::from("dataTable.txt"),
            series_output: PathBuf::from("volumeSeries.csv"),
        }
    }
}

impl QuoteConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
