//! Display-date helpers
//!
//! Transactions are shown as `DD Mon YYYY` ("28 Sep 2025") and goal target
//! months as `Mon YYYY` ("Oct 2028"). Month names come from a fixed English
//! abbreviation table so parsing never depends on the host locale.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|idx| idx as u32 + 1)
}

/// Parse a `DD Mon YYYY` display date
pub fn parse_display_date(s: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(Error::DateParse(s.to_string()));
    };

    let day: u32 = day.parse().map_err(|_| Error::DateParse(s.to_string()))?;
    let month = month_number(month).ok_or_else(|| Error::DateParse(s.to_string()))?;
    let year: i32 = year.parse().map_err(|_| Error::DateParse(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Error::DateParse(s.to_string()))
}

/// Format a date as `DD Mon YYYY`
pub fn format_display_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Parse a `Mon YYYY` target month, returning the first day of that month
pub fn parse_month_year(s: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let [month, year] = parts.as_slice() else {
        return Err(Error::DateParse(s.to_string()));
    };

    let month = month_number(month).ok_or_else(|| Error::DateParse(s.to_string()))?;
    let year: i32 = year.parse().map_err(|_| Error::DateParse(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| Error::DateParse(s.to_string()))
}

/// Format a date as `Mon YYYY`
pub fn format_month_year(date: NaiveDate) -> String {
    format!("{} {}", MONTHS[date.month0() as usize], date.year())
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `n` months before the month containing `date`
pub fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    month_start(date)
        .checked_sub_months(Months::new(n))
        .unwrap_or(NaiveDate::MIN)
}

/// Month index (year * 12 + month0) used for calendar-month arithmetic
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Clock instant used when a day is pinned: noon UTC on that day
pub fn noon_utc(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)) + Duration::hours(12)
}

/// Serde adapter storing dates in `DD Mon YYYY` form
pub mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_display_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_display_date(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter storing dates in `Mon YYYY` form
pub mod month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_month_year(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_month_year(&s).map_err(serde::de::Error::custom)
    }
}
