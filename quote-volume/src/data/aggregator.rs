//! Turns one quote file into one [`DayRecord`].

use std::io::BufRead;

use tracing::debug;

use super::parser::{self, LineKind, ParseError, ParseResult, DEFAULT_MARKER};
use super::top_n::TopVolumes;
use super::types::DayRecord;

/// Lines at the top of every file that never hold contract rows.
pub const HEADER_LINES: usize = 3;

/// Zero-based index of the line carrying the trade date.
pub const DATE_LINE: usize = 1;

/// Streams the lines of one quote file through the parser, keeping running
/// totals and the top contracts for each side.
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    marker: String,
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl DailyAggregator {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Build the day summary from a reader positioned at the start of a
    /// quote file.
    pub fn aggregate<R: BufRead>(&self, reader: R) -> ParseResult<DayRecord> {
        let mut date = None;
        let mut total_call_volume = 0u64;
        let mut total_put_volume = 0u64;
        let mut top_calls = TopVolumes::new();
        let mut top_puts = TopVolumes::new();
        let mut data_rows = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if idx == DATE_LINE {
                date = Some(parser::normalize_date(&line)?);
            }
            if idx < HEADER_LINES {
                continue;
            }

            let line_no = idx + 1;
            if parser::classify_line(&line, &self.marker, line_no)? == LineKind::Skip {
                continue;
            }

            let quote = parser::parse_line(&line, line_no)?;
            total_call_volume += quote.call.amount();
            total_put_volume += quote.put.amount();
            top_calls.consider(quote.call);
            top_puts.consider(quote.put);
            data_rows += 1;
        }

        let date = date.ok_or(ParseError::MissingDateLine)?;
        debug!(%date, data_rows, total_call_volume, total_put_volume, "aggregated quote file");

        Ok(DayRecord {
            date,
            total_call_volume,
            total_put_volume,
            top_calls: top_calls.into_vec(),
            top_puts: top_puts.into_vec(),
        })
    }
}
