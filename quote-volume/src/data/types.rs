//! Core data types for daily volume summaries.
//!
//! These types represent what survives parsing a quote file: individual
//! contracts with their traded volume, and one summary per trading day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of a normalized trade date.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Side of an option contract (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named contract and the amount traded that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    name: String,
    amount: u64,
}

impl OptionRecord {
    pub fn new(name: impl Into<String>, amount: u64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// Contract name as printed inside the parentheses of the quote line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Traded volume.
    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Summary of one quote file (one trading day).
///
/// `top_calls` and `top_puts` hold at most five records each, ascending by
/// amount, so index 0 is the smallest retained contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Trade date as `MM/DD/YYYY`
    pub date: String,

    /// Sum of call volume over all data rows
    pub total_call_volume: u64,

    /// Sum of put volume over all data rows
    pub total_put_volume: u64,

    /// Highest-volume calls, ascending
    pub top_calls: Vec<OptionRecord>,

    /// Highest-volume puts, ascending
    pub top_puts: Vec<OptionRecord>,
}

impl DayRecord {
    /// Parse the normalized date into a calendar date.
    pub fn trade_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Total volume for one side.
    pub fn total(&self, side: OptionSide) -> u64 {
        match side {
            OptionSide::Call => self.total_call_volume,
            OptionSide::Put => self.total_put_volume,
        }
    }

    /// Top contracts for one side, ascending by amount.
    pub fn top(&self, side: OptionSide) -> &[OptionRecord] {
        match side {
            OptionSide::Call => &self.top_calls,
            OptionSide::Put => &self.top_puts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> DayRecord {
        DayRecord {
            date: "03/07/2024".to_string(),
            total_call_volume: 400,
            total_put_volume: 100,
            top_calls: vec![OptionRecord::new("C1", 150), OptionRecord::new("C2", 250)],
            top_puts: vec![OptionRecord::new("P1", 100)],
        }
    }

    #[test]
    fn test_trade_date_parsing() {
        let day = sample_day();
        assert_eq!(day.trade_date(), NaiveDate::from_ymd_opt(2024, 3, 7));

        let bad = DayRecord {
            date: "13/40/2024".to_string(),
            ..sample_day()
        };
        assert_eq!(bad.trade_date(), None);
    }

    #[test]
    fn test_side_accessors() {
        let day = sample_day();
        assert_eq!(day.total(OptionSide::Call), 400);
        assert_eq!(day.total(OptionSide::Put), 100);
        assert_eq!(day.top(OptionSide::Call)[1].name(), "C2");
        assert_eq!(day.top(OptionSide::Put).len(), 1);
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&OptionSide::Call).unwrap(), "\"call\"");
        assert_eq!(OptionSide::Put.to_string(), "put");
    }
}
