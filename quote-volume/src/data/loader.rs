//! Discovery and loading of quote files.
//!
//! A data directory holds one text dump per trading day. Files are
//! candidates when their name starts with [`DEFAULT_FILE_PREFIX`]; a
//! candidate belongs to an option when the first token of its first line is
//! that option's symbol:
//!
//! ```text
//! ASHR (XTRACKERS HARVEST CSI 300),25.10,+0.12,
//! Mar 08 2024 @ 16:15 ET
//! Calls,Last Sale,Net,Bid,Ask,Vol,Open Int,Puts,Last Sale,Net,Bid,Ask,Vol,Open Int
//! 24 Mar 20.00 (ASHR2420C20),1.35,0.0,1.30,1.40,12,300,24 Mar 20.00 (ASHR2420O20),...
//! ```
//!
//! Files are processed in directory-listing order, not by date.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::aggregator::DailyAggregator;
use super::parser::{ParseError, DEFAULT_MARKER};
use super::types::DayRecord;
use crate::config::QuoteConfig;

/// Name prefix shared by all quote files.
pub const DEFAULT_FILE_PREFIX: &str = "QuoteData";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No quote files with prefix {prefix:?} in {dir}")]
    NoQuoteFiles { dir: String, prefix: String },

    #[error("Not a valid option name: {option} (no matching quote files in {dir})")]
    UnknownOption { option: String, dir: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid quote file {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl LoaderError {
    /// Faults caused by the requested option or directory rather than by
    /// file contents.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NoQuoteFiles { .. } | Self::UnknownOption { .. })
    }

    /// The underlying parse fault, if this error came from a file's
    /// contents.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::InvalidFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type LoaderResult<T> = Result<T, LoaderError>;

/// A file left out of a dataset because it failed to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Builds [`Dataset`]s from a directory of quote files.
#[derive(Debug, Clone)]
pub struct DataLoader {
    file_prefix: String,
    aggregator: DailyAggregator,
    skip_invalid_files: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            aggregator: DailyAggregator::new(DEFAULT_MARKER),
            skip_invalid_files: false,
        }
    }

    pub fn from_config(config: &QuoteConfig) -> Self {
        Self::new()
            .with_file_prefix(&config.file_prefix)
            .with_marker(&config.marker)
            .skip_invalid_files(config.skip_invalid_files)
    }

    pub fn with_file_prefix(mut self, prefix: &str) -> Self {
        self.file_prefix = prefix.to_string();
        self
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.aggregator = DailyAggregator::new(marker);
        self
    }

    /// When set, a file that fails to parse is logged and left out instead
    /// of aborting the whole load.
    pub fn skip_invalid_files(mut self, skip: bool) -> Self {
        self.skip_invalid_files = skip;
        self
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// Files in `dir` whose name carries the quote-file prefix, in listing
    /// order.
    pub fn candidate_files(&self, dir: &Path) -> LoaderResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&self.file_prefix) {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    /// Candidate files whose first-line symbol equals `option`.
    ///
    /// Fails when the directory has no candidates at all, or when none of
    /// them belongs to `option`.
    pub fn matching_files(&self, dir: &Path, option: &str) -> LoaderResult<Vec<PathBuf>> {
        let candidates = self.candidate_files(dir)?;
        if candidates.is_empty() {
            return Err(LoaderError::NoQuoteFiles {
                dir: dir.display().to_string(),
                prefix: self.file_prefix.clone(),
            });
        }

        let mut files = Vec::with_capacity(candidates.len());
        for path in candidates {
            if read_symbol(&path)? == option {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(LoaderError::UnknownOption {
                option: option.to_string(),
                dir: dir.display().to_string(),
            });
        }
        Ok(files)
    }

    /// Aggregate a single quote file.
    pub fn load_day(&self, path: &Path) -> LoaderResult<DayRecord> {
        let file = File::open(path).map_err(|source| LoaderError::Read {
            path: path.display().to_string(),
            source,
        })?;

        self.aggregator
            .aggregate(BufReader::new(file))
            .map_err(|source| LoaderError::InvalidFile {
                path: path.display().to_string(),
                source,
            })
    }

    /// Load every quote file for `option` in `dir`.
    pub fn load(&self, dir: &Path, option: &str) -> LoaderResult<Dataset> {
        let mut dataset = Dataset::empty(dir, option);
        self.fill(&mut dataset)?;
        Ok(dataset)
    }

    fn fill(&self, dataset: &mut Dataset) -> LoaderResult<()> {
        info!(
            option = %dataset.option,
            dir = %dataset.data_dir.display(),
            "Loading quote files"
        );

        let files = self.matching_files(&dataset.data_dir, &dataset.option)?;
        let mut days = Vec::with_capacity(files.len());
        let mut loaded = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for path in files {
            match self.load_day(&path) {
                Ok(day) => {
                    debug!(file = %path.display(), date = %day.date, "Loaded quote file");
                    days.push(day);
                    loaded.push(path);
                }
                Err(err) if self.skip_invalid_files => {
                    warn!(file = %path.display(), error = %err, "Skipping quote file");
                    skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            option = %dataset.option,
            days = days.len(),
            skipped = skipped.len(),
            "Loaded {} trading days",
            days.len()
        );

        dataset.files = loaded;
        dataset.days = days;
        dataset.skipped = skipped;
        Ok(())
    }
}

/// Symbol token of a quote file: the text of the first line before its
/// first space.
pub fn read_symbol(path: &Path) -> LoaderResult<String> {
    let file = File::open(path).map_err(|source| LoaderError::Read {
        path: path.display().to_string(),
        source,
    })?;

    // Non-UTF-8 first lines decode lossily and never match a symbol.
    let mut first = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first)
        .map_err(|source| LoaderError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let line = String::from_utf8_lossy(&first);
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    Ok(line.split(' ').next().unwrap_or_default().to_string())
}

/// All trading days loaded for one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    option: String,
    data_dir: PathBuf,
    files: Vec<PathBuf>,
    days: Vec<DayRecord>,
    #[serde(default)]
    skipped: Vec<SkippedFile>,
}

impl Dataset {
    fn empty(dir: &Path, option: &str) -> Self {
        Self {
            option: option.to_string(),
            data_dir: dir.to_path_buf(),
            files: Vec::new(),
            days: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Option symbol this dataset was built for.
    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Quote files that produced a day record, in load order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Day records, one per file in [`Dataset::files`].
    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Drop all loaded files and day records.
    pub fn clear(&mut self) {
        self.files.clear();
        self.days.clear();
        self.skipped.clear();
    }

    /// Replace the contents with a fresh load of the same directory and
    /// option. On failure the dataset is left cleared.
    pub fn reload(&mut self, loader: &DataLoader) -> LoaderResult<()> {
        self.clear();
        loader.fill(self)
    }
}
