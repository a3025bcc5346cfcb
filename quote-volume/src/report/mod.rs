//! Output renderings of a loaded dataset.
//!
//! - Text table: one block per trading day in load order
//! - Volume series: call/put totals ordered by date, for plotting

pub mod series;
pub mod table;

use thiserror::Error;

pub use series::{SeriesFormat, VolumePoint, VolumeSeries};
pub use table::{render_day, render_table, write_table};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trade date: {0:?}")]
    InvalidDate(String),

    #[error("Unknown series format: {0:?} (expected csv or json)")]
    UnknownFormat(String),
}

pub type ReportResult<T> = Result<T, ReportError>;
