//! Daily call/put volume summaries from options quote text dumps.
//!
//! A quote directory holds one text file per trading day. For a given
//! option symbol this crate:
//! - Finds the matching files ([`data::DataLoader`])
//! - Sums call and put volume for each day and keeps the five most traded
//!   contracts per side ([`data::DailyAggregator`], [`data::TopVolumes`])
//! - Renders a text summary or a date-ordered volume series ([`report`])

pub mod config;
pub mod data;
pub mod report;

// Re-export commonly used types
pub use config::{ConfigError, QuoteConfig};
pub use data::{
    DailyAggregator, DataLoader, Dataset, DayRecord, LoaderError, OptionRecord, OptionSide,
    ParseError, TopVolumes,
};
pub use report::{ReportError, SeriesFormat, VolumeSeries};
