//! Plain-text summary table.
//!
//! ```text
//!
//! 03/08/2024
//! call: 1250
//! put: 830
//! top call: ASHR2420C25, ASHR2420C24, ASHR2420C23
//! top put: ASHR2420O22, ASHR2420O21
//!
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use super::ReportResult;
use crate::data::{Dataset, DayRecord, OptionRecord};

fn join_names(records: &[OptionRecord]) -> String {
    records
        .iter()
        .map(OptionRecord::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One day's block, terminated by a newline.
pub fn render_day(day: &DayRecord) -> String {
    format!(
        "{}\ncall: {}\nput: {}\ntop call: {}\ntop put: {}\n",
        day.date,
        day.total_call_volume,
        day.total_put_volume,
        join_names(&day.top_calls),
        join_names(&day.top_puts)
    )
}

/// All days in the given order, each block followed by a blank line.
pub fn render_table(days: &[DayRecord]) -> String {
    let mut out = String::from("\n");
    for day in days {
        out.push_str(&render_day(day));
        out.push('\n');
    }
    out
}

pub fn write_table(path: &Path, days: &[DayRecord]) -> ReportResult<()> {
    fs::write(path, render_table(days))?;
    Ok(())
}

impl fmt::Display for DayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_day(self))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_table(self.days()))
    }
}
