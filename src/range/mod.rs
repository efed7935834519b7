//! Time range tokens and date-range resolution
//!
//! A [`TimeRangeToken`] is the symbolic selector the user picks ("1m",
//! "ytd", ...). [`resolve`] turns it into a concrete [`DateRange`] relative
//! to a given "today", using calendar-aware month arithmetic.

pub mod encoder;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::TrackRecordError;

pub use encoder::RangeQuery;

/// First day of the track record. The "actual" range always starts here.
pub const INCEPTION_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2020, 3, 31) {
    Some(d) => d,
    None => panic!("inception date is a valid calendar date"),
};

/// Date format used on the wire and on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Symbolic range selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum TimeRangeToken {
    /// Since inception
    Actual,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    TwoYears,
    FiveYears,
    /// Dates entered by hand
    Custom,
}

impl TimeRangeToken {
    pub const ALL: [TimeRangeToken; 10] = [
        TimeRangeToken::Actual,
        TimeRangeToken::OneWeek,
        TimeRangeToken::OneMonth,
        TimeRangeToken::ThreeMonths,
        TimeRangeToken::SixMonths,
        TimeRangeToken::YearToDate,
        TimeRangeToken::OneYear,
        TimeRangeToken::TwoYears,
        TimeRangeToken::FiveYears,
        TimeRangeToken::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRangeToken::Actual => "actual",
            TimeRangeToken::OneWeek => "1w",
            TimeRangeToken::OneMonth => "1m",
            TimeRangeToken::ThreeMonths => "3m",
            TimeRangeToken::SixMonths => "6m",
            TimeRangeToken::YearToDate => "ytd",
            TimeRangeToken::OneYear => "1y",
            TimeRangeToken::TwoYears => "2y",
            TimeRangeToken::FiveYears => "5y",
            TimeRangeToken::Custom => "custom",
        }
    }

    /// Human-readable label shown in range pickers
    pub fn label(&self) -> &'static str {
        match self {
            TimeRangeToken::Actual => "Actual",
            TimeRangeToken::OneWeek => "1 Week",
            TimeRangeToken::OneMonth => "1 Month",
            TimeRangeToken::ThreeMonths => "3 Months",
            TimeRangeToken::SixMonths => "6 Months",
            TimeRangeToken::YearToDate => "YTD",
            TimeRangeToken::OneYear => "1 Year",
            TimeRangeToken::TwoYears => "2 Years",
            TimeRangeToken::FiveYears => "5 Years",
            TimeRangeToken::Custom => "Custom Dates",
        }
    }

    /// Calendar months to step back from today, for month/year offsets
    fn months_back(&self) -> Option<u32> {
        match self {
            TimeRangeToken::OneMonth => Some(1),
            TimeRangeToken::ThreeMonths => Some(3),
            TimeRangeToken::SixMonths => Some(6),
            TimeRangeToken::OneYear => Some(12),
            TimeRangeToken::TwoYears => Some(24),
            TimeRangeToken::FiveYears => Some(60),
            _ => None,
        }
    }
}

impl fmt::Display for TimeRangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TimeRangeToken> for &'static str {
    fn from(token: TimeRangeToken) -> Self {
        token.as_str()
    }
}

impl FromStr for TimeRangeToken {
    type Err = TrackRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TimeRangeToken::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| TrackRecordError::UnknownTimeRange(s.to_string()))
    }
}

/// Inclusive calendar date range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TrackRecordError> {
        if start > end {
            return Err(TrackRecordError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Today's local calendar date, taken as a plain day with no timezone attached
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, TrackRecordError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TrackRecordError::InvalidDate(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Resolve a token into concrete dates relative to `today`.
///
/// Returns `None` for [`TimeRangeToken::Custom`]: custom ranges keep whatever
/// dates the user entered. Month and year offsets clamp to the last valid day
/// of the target month, so one month before March 31 is the end of February.
pub fn resolve(token: TimeRangeToken, today: NaiveDate) -> Option<DateRange> {
    let start = match token {
        TimeRangeToken::Custom => return None,
        TimeRangeToken::Actual => INCEPTION_DATE,
        TimeRangeToken::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
        TimeRangeToken::OneWeek => today.checked_sub_days(Days::new(7))?,
        other => {
            let months = other.months_back()?;
            today.checked_sub_months(Months::new(months))?
        }
    };

    // "actual" is the only range that can start after today (a clock set
    // before inception); collapse it to a single day rather than invert.
    let start = start.min(today);
    DateRange::new(start, today).ok()
}
