//! Positional parser for quote-dump text lines.
//!
//! Quote files carry no schema. Each data row lists a call and a put for the
//! same strike, e.g.
//!
//! ```text
//! 24 Jan 20.00 (ASHR2420A20),1.35,0.0,1.30,1.40,12,300,24 Jan 20.00 (ASHR2420M20),0.05,0.0,0.04,0.06,7,120
//! ```
//!
//! Contract names sit inside the first and second pair of parentheses, and
//! the volumes are whole fields between fixed comma ordinals. All offsets
//! are named constants below so a layout change is a one-line fix.

use std::io;

use thiserror::Error;

use super::types::{OptionRecord, OptionSide};

/// Commas preceding the call volume field.
pub const CALL_VOLUME_COMMA: usize = 5;

/// Commas preceding the put volume field.
pub const PUT_VOLUME_COMMA: usize = 12;

/// Default marker token used by the eligibility filter.
pub const DEFAULT_MARKER: &str = "ASHR";

/// Dash offsets (relative to the marker) that identify non-data rows.
pub const MARKER_DASH_OFFSETS: [usize; 2] = [11, 13];

/// Absolute dash positions that are only valid on rows matched by the
/// marker rule. Anything else landing here is an unknown layout.
pub const RESERVED_DASH_POSITIONS: [usize; 2] = [25, 27];

/// Month abbreviations in calendar order.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Width of the fixed date field at the start of the date line.
const DATE_FIELD_WIDTH: usize = 11;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unknown month abbreviation: {0:?}")]
    UnknownMonth(String),

    #[error("Malformed date field: {0:?}")]
    MalformedDate(String),

    #[error("Missing date line")]
    MissingDateLine,

    #[error("Line {line}: dash at reserved position {position} without marker match")]
    UnexpectedDashOffset { line: usize, position: usize },

    #[error("Line {line}: expected at least {count} {delimiter:?} delimiters")]
    MissingDelimiter {
        line: usize,
        delimiter: char,
        count: usize,
    },

    #[error("Line {line}: invalid {side} volume {text:?}")]
    InvalidVolume {
        line: usize,
        side: OptionSide,
        text: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Faults that indicate an unrecognized file layout rather than a bad
    /// value.
    pub fn is_format_fault(&self) -> bool {
        matches!(
            self,
            Self::UnknownMonth(_)
                | Self::MalformedDate(_)
                | Self::MissingDateLine
                | Self::UnexpectedDashOffset { .. }
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// How a raw line is treated by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A per-contract row to parse.
    Data,
    /// Header, footer or blank row.
    Skip,
}

/// Call and put contracts extracted from one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    pub call: OptionRecord,
    pub put: OptionRecord,
}

/// Classify a line as data or non-data.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn classify_line(line: &str, marker: &str, line_no: usize) -> ParseResult<LineKind> {
    if line.trim().is_empty() {
        return Ok(LineKind::Skip);
    }

    let Some(dash) = line.find('-') else {
        return Ok(LineKind::Data);
    };

    if let Some(marker_pos) = line.find(marker) {
        if MARKER_DASH_OFFSETS
            .iter()
            .any(|offset| dash == marker_pos + offset)
        {
            return Ok(LineKind::Skip);
        }
    }

    if RESERVED_DASH_POSITIONS.contains(&dash) {
        return Err(ParseError::UnexpectedDashOffset {
            line: line_no,
            position: dash,
        });
    }

    Ok(LineKind::Data)
}

/// Parse a data row into its call and put records.
pub fn parse_line(line: &str, line_no: usize) -> ParseResult<QuoteLine> {
    let call = OptionRecord::new(call_name(line, line_no)?, call_volume(line, line_no)?);
    let put = OptionRecord::new(put_name(line, line_no)?, put_volume(line, line_no)?);
    Ok(QuoteLine { call, put })
}

/// Text between the 1st `(` and the 1st `)`.
pub fn call_name(line: &str, line_no: usize) -> ParseResult<&str> {
    enclosed(line, 1, line_no)
}

/// Text between the 2nd `(` and the 2nd `)`.
pub fn put_name(line: &str, line_no: usize) -> ParseResult<&str> {
    enclosed(line, 2, line_no)
}

pub fn call_volume(line: &str, line_no: usize) -> ParseResult<u64> {
    volume_after_comma(line, CALL_VOLUME_COMMA, OptionSide::Call, line_no)
}

pub fn put_volume(line: &str, line_no: usize) -> ParseResult<u64> {
    volume_after_comma(line, PUT_VOLUME_COMMA, OptionSide::Put, line_no)
}

/// Position of the `n`th (1-based) occurrence of `delimiter`.
pub fn nth_delimiter(line: &str, delimiter: char, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    line.match_indices(delimiter).nth(n - 1).map(|(idx, _)| idx)
}

/// Field between the `n`th and `n + 1`th occurrence of `delimiter`.
pub fn nth_delimited(line: &str, delimiter: char, n: usize) -> Option<&str> {
    let start = nth_delimiter(line, delimiter, n)? + delimiter.len_utf8();
    let len = line[start..].find(delimiter)?;
    Some(&line[start..start + len])
}

fn enclosed(line: &str, n: usize, line_no: usize) -> ParseResult<&str> {
    let open = nth_delimiter(line, '(', n).ok_or(ParseError::MissingDelimiter {
        line: line_no,
        delimiter: '(',
        count: n,
    })?;
    let close = nth_delimiter(line, ')', n).ok_or(ParseError::MissingDelimiter {
        line: line_no,
        delimiter: ')',
        count: n,
    })?;

    line.get(open + 1..close).ok_or(ParseError::MissingDelimiter {
        line: line_no,
        delimiter: ')',
        count: n,
    })
}

fn volume_after_comma(
    line: &str,
    comma: usize,
    side: OptionSide,
    line_no: usize,
) -> ParseResult<u64> {
    let field = nth_delimited(line, ',', comma).ok_or(ParseError::MissingDelimiter {
        line: line_no,
        delimiter: ',',
        count: comma + 1,
    })?;

    field
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidVolume {
            line: line_no,
            side,
            text: field.to_string(),
        })
}

/// Two-digit month number for an abbreviation such as `"Jan"`.
pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|idx| idx as u32 + 1)
}

/// Normalize a fixed-width `"Mon DD YYYY"` date into `"MM/DD/YYYY"`.
///
/// Only the first eleven characters are read: month at 0..3, day at 4..6,
/// year at 7..11.
pub fn normalize_date(raw: &str) -> ParseResult<String> {
    let field = raw.get(..DATE_FIELD_WIDTH).unwrap_or(raw);

    let month = field
        .get(0..3)
        .ok_or_else(|| ParseError::MalformedDate(raw.to_string()))?;
    let month = month_number(month).ok_or_else(|| ParseError::UnknownMonth(month.to_string()))?;

    let day = field
        .get(4..6)
        .ok_or_else(|| ParseError::MalformedDate(raw.to_string()))?;
    let year = field
        .get(7..)
        .filter(|y| !y.is_empty())
        .ok_or_else(|| ParseError::MalformedDate(raw.to_string()))?;

    Ok(format!("{:02}/{}/{}", month, day, year))
}
