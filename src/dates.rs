use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::dates::{
    CANONICAL_FORMAT, DAY_FIRST_DELIMITERS, MAX_YEAR, MIN_YEAR, SERIAL_EPOCH,
    SERIAL_LEAP_BUG_THRESHOLD, YEAR_FIRST_FORMATS, YEAR_FIRST_TIMESTAMP_FORMATS,
};
use crate::errors::ReportError;
use crate::row::CellValue;

/// A validated calendar day with no time component.
///
/// The only text form is `DD/MM/YYYY`, so two differently spelled inputs for
/// the same day always produce the same aggregation key. Ordering is
/// chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate(NaiveDate);

impl CanonicalDate {
    /// Build from year, month (1-12) and day; `None` if the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Wrap an already valid chrono date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying chrono date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of year, 1-12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1-31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Convert a spreadsheet serial day number.
    ///
    /// Serial 1 is 1900-01-01. Serials above 59 are shifted back one day
    /// because the spreadsheet format counts a 29 February 1900 that never
    /// existed, so 59 and 60 both land on 28/02/1900 and 61 is 01/03/1900.
    /// Fractional parts (time of day) are dropped.
    pub fn from_serial(serial: f64) -> Option<Self> {
        if !serial.is_finite() {
            return None;
        }
        let mut days = serial.floor();
        if days > SERIAL_LEAP_BUG_THRESHOLD {
            days -= 1.0;
        }
        let (year, month, day) = SERIAL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
        let offset = days as i64;
        let date = if offset >= 0 {
            epoch.checked_add_days(Days::new(offset.unsigned_abs()))
        } else {
            epoch.checked_sub_days(Days::new(offset.unsigned_abs()))
        }?;
        Some(Self(date))
    }

    /// Parse a date string exported in any of the supported conventions.
    ///
    /// Only the first whitespace-delimited token is considered, which drops a
    /// trailing time of day (`4/6/2025 10:30:00 πμ`). Day-month-year with `/`,
    /// `-` or `.` is tried first, then year-first ISO-like forms. Month names
    /// are never interpreted.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.split_whitespace().next()?;
        DAY_FIRST_DELIMITERS
            .iter()
            .find_map(|delimiter| parse_day_first(token, *delimiter))
            .or_else(|| parse_year_first(token))
    }
}

/// Normalize any cell into a canonical date, or `None` when it is not one.
pub fn normalize(raw: &CellValue) -> Option<CanonicalDate> {
    match raw {
        CellValue::Text(text) => CanonicalDate::parse(text),
        CellValue::Number(serial) => CanonicalDate::from_serial(*serial),
        CellValue::Empty => None,
    }
}

/// `DD/MM/YYYY` day-month-year with one delimiter, bounded to 1900-2100.
///
/// The year part only needs to start with digits, so locale strings such as
/// `1/8/2025, 10:30:00 π.μ.` keep their date.
fn parse_day_first(token: &str, delimiter: char) -> Option<CanonicalDate> {
    let mut parts = token.split(delimiter);
    let day: u32 = parse_component(parts.next()?)?;
    let month: u32 = parse_component(parts.next()?)?;
    let year: i32 = parse_leading_digits(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    if !(1..=31).contains(&day)
        || !(1..=12).contains(&month)
        || !(MIN_YEAR..=MAX_YEAR).contains(&year)
    {
        return None;
    }
    CanonicalDate::from_ymd(year, month, day)
}

fn parse_component<T: FromStr>(part: &str) -> Option<T> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Leading run of ASCII digits; trailing text such as `,` is ignored.
fn parse_leading_digits<T: FromStr>(part: &str) -> Option<T> {
    let end = part
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(part.len());
    parse_component(&part[..end])
}

/// Generic fallback for year-first dates and timestamps.
fn parse_year_first(token: &str) -> Option<CanonicalDate> {
    // chrono's %Y accepts short years; demand four leading digits.
    let year = token.get(..4)?;
    if !year.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    for format in YEAR_FIRST_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return Some(CanonicalDate(date));
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(token) {
        return Some(CanonicalDate(timestamp.date_naive()));
    }
    for format in YEAR_FIRST_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(token, format) {
            return Some(CanonicalDate(timestamp.date()));
        }
    }
    None
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for CanonicalDate {
    type Err = ReportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| ReportError::InvalidDate(raw.to_string()))
    }
}

impl Serialize for CanonicalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
