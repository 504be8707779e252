use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_english::{parse_date_string, Dialect};
use chrono_tz::Tz;
use classplan_core::models::{PersonalEntryType, ScheduleStatus};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Failed to parse time '{0}' (expected e.g. '09:00' or '2:30 PM')")]
    Time(String),
    #[error("Failed to parse date '{0}': {1}")]
    Date(String, String),
    #[error("{0}")]
    Status(String),
    #[error("{0}")]
    EntryType(String),
}

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Current instant in `tz`, as the fixed offset the natural-language parser works in.
fn now_in(tz: Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&tz).fixed_offset()
}

pub fn parse_time(input: &str) -> Result<NaiveTime, InputError> {
    let trimmed = input.trim();
    let mut upper = trimmed.to_uppercase();
    // "4pm" and "16" carry no minutes
    if !upper.contains(':') {
        let digits_end = upper.find(|c: char| !c.is_ascii_digit()).unwrap_or(upper.len());
        upper = format!("{}:00{}", &upper[..digits_end], &upper[digits_end..]);
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&upper, fmt).ok())
        .ok_or_else(|| InputError::Time(trimmed.to_string()))
}

/// Parses `YYYY-MM-DD` or an English phrase ("today", "next monday") in `tz`.
pub fn parse_date(input: &str, tz: Tz) -> Result<NaiveDate, InputError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(trimmed, now_in(tz), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| InputError::Date(trimmed.to_string(), e.to_string()))
}

/// Parses a wall-clock datetime, either ISO-like or an English phrase, in `tz`.
pub fn parse_datetime(input: &str, tz: Tz) -> Result<NaiveDateTime, InputError> {
    let trimmed = input.trim();
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(dt);
    }
    parse_date_string(trimmed, now_in(tz), Dialect::Us)
        .map(|dt| dt.naive_local())
        .map_err(|e| InputError::Date(trimmed.to_string(), e.to_string()))
}

pub fn parse_status(input: &str) -> Result<ScheduleStatus, InputError> {
    input
        .parse()
        .map_err(|e: classplan_core::models::ParseScheduleStatusError| InputError::Status(e.to_string()))
}

pub fn parse_entry_type(input: &str) -> Result<PersonalEntryType, InputError> {
    input
        .parse()
        .map_err(|e: classplan_core::models::ParsePersonalEntryTypeError| InputError::EntryType(e.to_string()))
}

/// Monday of the week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
