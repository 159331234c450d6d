//! Date parsing and weekly bucketing.
//!
//! Sales exports mix ISO dates with regional `DD/MM/YYYY` and US `MM/DD/YYYY`.
//! We try a fixed list of formats in order, so parsing stays deterministic:
//! day-first formats come before month-first ones, which means an ambiguous
//! `03/04/2024` is read as 3 April. Month-first only wins when day-first
//! cannot be valid (e.g. `12/25/2024`).

use chrono::{Datelike, Duration, NaiveDate};

/// Human-readable list of accepted formats (for error hints).
pub const ACCEPTED_DATE_FORMATS: [&str; 6] = [
    "DD/MM/YYYY",
    "MM/DD/YYYY",
    "YYYY-MM-DD",
    "YYYY/MM/DD",
    "DD-MM-YYYY",
    "DD.MM.YYYY",
];

const FOUR_DIGIT_YEAR_FMTS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%m/%d/%Y", "%m-%d-%Y",
];

const TWO_DIGIT_YEAR_FMTS: [&str; 4] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%m/%d/%y"];

/// Parse a raw date cell. Returns `None` when no accepted format matches.
///
/// A trailing time of day (`2024-03-01 10:15:00`, `2024-03-01T10:15`) is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let s = s.split(['T', ' ']).next().unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    for fmt in FOUR_DIGIT_YEAR_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            // chrono's `%Y` also accepts short years ("24"); those belong to `%y`.
            if d.year() >= 1000 {
                return Some(d);
            }
        }
    }
    for fmt in TWO_DIGIT_YEAR_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The `n`-th week after `week` (1-based: `weeks_after(w, 1)` is the next week).
pub fn weeks_after(week: NaiveDate, n: usize) -> NaiveDate {
    week + Duration::weeks(n as i64)
}
