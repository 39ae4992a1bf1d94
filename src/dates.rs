//! Parsing and formatting for the string-encoded dates (`d/M/yyyy`) and
//! times (`HH:mm`) stored on timers.
use chrono::{NaiveDate, NaiveTime};

use crate::error::{KronosError, Result};

const DATE_FORMAT: &str = "%d/%m/%Y";
const DISPLAY_DATE_FORMAT: &str = "%-d/%-m/%Y";
const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| KronosError::DateParse(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| KronosError::TimeParse(value.to_string()))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Signed number of hours from `start` to `end` on the same day.
pub fn hours_between(start: &str, end: &str) -> Result<f64> {
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    Ok(end.signed_duration_since(start).num_seconds() as f64 / 3600.0)
}
