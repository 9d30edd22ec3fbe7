//! Named relative date windows for scoping the transaction view
//!
//! Every window is evaluated against an explicit `today` so the filter is a
//! pure function of its inputs. The CLI and server pass the local date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{month_index, months_back};

/// Relative time window applied to transaction dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineFilter {
    /// Same calendar month and year as today
    #[default]
    CurrentMonth,
    /// The calendar month before today's
    PreviousMonth,
    /// Current or previous calendar month
    CurrentAndPrevious,
    /// From the start of the month two months back, up to today
    #[serde(rename = "last-3-months")]
    Last3Months,
    /// From the start of the month five months back, up to today
    #[serde(rename = "last-6-months")]
    Last6Months,
    /// From 1 January, up to today
    YearToDate,
    /// From the start of the same month two years ago, up to today
    #[serde(rename = "last-2-years")]
    Last2Years,
}

impl TimelineFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentMonth => "current-month",
            Self::PreviousMonth => "previous-month",
            Self::CurrentAndPrevious => "current-and-previous",
            Self::Last3Months => "last-3-months",
            Self::Last6Months => "last-6-months",
            Self::YearToDate => "year-to-date",
            Self::Last2Years => "last-2-years",
        }
    }

    /// Human label for menus
    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentMonth => "Current Month",
            Self::PreviousMonth => "Previous Month",
            Self::CurrentAndPrevious => "Current + Previous Month",
            Self::Last3Months => "Last 3 Months",
            Self::Last6Months => "Last 6 Months",
            Self::YearToDate => "Year to Date",
            Self::Last2Years => "Last 2 Years",
        }
    }

    /// Get all filters in menu order
    pub fn all() -> &'static [TimelineFilter] {
        &[
            Self::CurrentMonth,
            Self::PreviousMonth,
            Self::CurrentAndPrevious,
            Self::Last3Months,
            Self::Last6Months,
            Self::YearToDate,
            Self::Last2Years,
        ]
    }

    /// Inclusive `(start, end)` range covered by this window
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let this_month = months_back(today, 0);
        let end_of = |start: NaiveDate| {
            start
                .checked_add_months(chrono::Months::new(1))
                .and_then(|d| d.pred_opt())
                .unwrap_or(NaiveDate::MAX)
        };

        match self {
            Self::CurrentMonth => (this_month, end_of(this_month)),
            Self::PreviousMonth => {
                let prev = months_back(today, 1);
                (prev, end_of(prev))
            }
            Self::CurrentAndPrevious => (months_back(today, 1), end_of(this_month)),
            Self::Last3Months => (months_back(today, 2), today),
            Self::Last6Months => (months_back(today, 5), today),
            Self::YearToDate => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(this_month),
                today,
            ),
            Self::Last2Years => (months_back(today, 24), today),
        }
    }

    /// Whether a transaction dated `date` falls inside this window
    pub fn includes(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let current = month_index(today);
        let month = month_index(date);

        match self {
            Self::CurrentMonth => month == current,
            Self::PreviousMonth => month == current - 1,
            Self::CurrentAndPrevious => month == current || month == current - 1,
            _ => {
                let (start, end) = self.date_range(today);
                date >= start && date <= end
            }
        }
    }
}

impl fmt::Display for TimelineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimelineFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown timeline filter: {}", s))
    }
}
