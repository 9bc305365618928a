//! Calendar-day keys.
//!
//! Every timestamp is reduced to a UTC calendar date. Naive timestamps (no
//! offset) are read as UTC, plain `YYYY-MM-DD` dates are taken as-is.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, TrackerError};

const DAY_FORMAT: &str = "%Y-%m-%d";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a date or timestamp string into its UTC calendar day.
pub fn day_key(input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TrackerError::invalid("empty date"));
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, DAY_FORMAT) {
        return Ok(day);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(day_key_from_datetime(dt));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.date());
        }
    }

    Err(TrackerError::invalid(format!("not a valid date: {:?}", input)))
}

pub fn day_key_from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> NaiveDate {
    dt.with_timezone(&Utc).date_naive()
}

pub fn format_day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Current UTC day.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Days counted back from `today`, `None` if that falls before `NaiveDate::MIN`.
pub fn days_back(today: NaiveDate, n: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(n)))
}
