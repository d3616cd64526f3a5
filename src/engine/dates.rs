//! Calendar-date parsing and day arithmetic.
//!
//! Dates are split into explicit year / month / day components before a
//! `NaiveDate` is built, so nothing depends on locale or time-zone aware
//! parsing. All arithmetic happens on the proleptic Gregorian calendar (UTC).

use chrono::{Days, NaiveDate, Utc};

use super::EngineError;

/// Parse `YYYY-MM-DD`, or the calendar part of an ISO-8601 timestamp
/// (`YYYY-MM-DDTHH:MM:SS...`). The calendar part is kept verbatim.
pub fn parse_calendar_date(field: &'static str, value: &str) -> Result<NaiveDate, EngineError> {
    let invalid = || EngineError::InvalidDate {
        field,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let calendar = match trimmed.split_once(|c: char| c == 'T' || c == ' ') {
        Some((date, time)) if !time.is_empty() => date,
        Some(_) => return Err(invalid()),
        None => trimmed,
    };

    let mut parts = calendar.split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let year = component(y, 4).ok_or_else(invalid)?;
    let month = component(m, 2).ok_or_else(invalid)?;
    let day = component(d, 2).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

fn component(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// `date + days` calendar days
pub fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, EngineError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| EngineError::InvalidDate {
            field: "next_due_date",
            value: format!("{} + {} days", date, days),
        })
}

/// Signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Current calendar date in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
