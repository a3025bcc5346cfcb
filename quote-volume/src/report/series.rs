//! Date-ordered call/put volume series for plotting.
//!
//! Day records keep the directory order they were loaded in; a plot needs
//! them ordered by trade date with a numeric x value, so each point carries
//! the number of days since 1970-01-01.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ReportError, ReportResult};
use crate::data::DayRecord;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Output encoding of a series file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    Csv,
    Json,
}

impl SeriesFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

impl FromStr for SeriesFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Call and put totals for one trade date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    /// Days since 1970-01-01
    pub day: i32,
    pub calls: u64,
    pub puts: u64,
}

impl VolumePoint {
    pub fn new(date: NaiveDate, calls: u64, puts: u64) -> Self {
        Self {
            date,
            day: date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE,
            calls,
            puts,
        }
    }
}

/// Volume points for one option, ascending by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSeries {
    pub option: String,
    pub points: Vec<VolumePoint>,
}

impl VolumeSeries {
    /// Build a series from day records in any order.
    ///
    /// Fails if a record's date is not a valid `MM/DD/YYYY` calendar date.
    pub fn from_days(option: &str, days: &[DayRecord]) -> ReportResult<Self> {
        let mut points = days
            .iter()
            .map(|day| -> ReportResult<VolumePoint> {
                let date = day
                    .trade_date()
                    .ok_or_else(|| ReportError::InvalidDate(day.date.clone()))?;
                Ok(VolumePoint::new(
                    date,
                    day.total_call_volume,
                    day.total_put_volume,
                ))
            })
            .collect::<ReportResult<Vec<_>>>()?;
        points.sort_by_key(|p| p.date);

        Ok(Self {
            option: option.to_string(),
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last date covered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Write `date,day,calls,puts` rows with a header.
    pub fn write_csv<W: Write>(&self, writer: W) -> ReportResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in &self.points {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> ReportResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn save(&self, path: &Path, format: SeriesFormat) -> ReportResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        match format {
            SeriesFormat::Csv => self.write_csv(&mut writer)?,
            SeriesFormat::Json => self.write_json(&mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }
}
