//! Request encoding for the analytics endpoints
//!
//! The proxy takes `startDate`, `endDate` and `timeRange` as query
//! parameters; the upstream service takes the same values as positional
//! path segments. Both use the same time range segment convention:
//! `--` for "actual", `---` for "custom", the token itself otherwise.

use chrono::NaiveDate;
use serde::Serialize;

use super::{format_date, parse_date, DateRange, TimeRangeToken};
use crate::error::TrackRecordError;

pub const START_DATE_PARAM: &str = "startDate";
pub const END_DATE_PARAM: &str = "endDate";
pub const TIME_RANGE_PARAM: &str = "timeRange";

const ACTUAL_SEGMENT: &str = "--";
const CUSTOM_SEGMENT: &str = "---";

/// Time range segment for a token
pub fn segment(token: TimeRangeToken) -> &'static str {
    match token {
        TimeRangeToken::Actual => ACTUAL_SEGMENT,
        TimeRangeToken::Custom => CUSTOM_SEGMENT,
        other => other.as_str(),
    }
}

/// Decode a time range segment. Plain token names other than "actual" and
/// "custom" are accepted; anything else is rejected.
pub fn parse_segment(s: &str) -> Result<TimeRangeToken, TrackRecordError> {
    match s {
        ACTUAL_SEGMENT => Ok(TimeRangeToken::Actual),
        CUSTOM_SEGMENT => Ok(TimeRangeToken::Custom),
        _ => {
            let token: TimeRangeToken = s.parse()?;
            if segment(token) != token.as_str() {
                // "actual"/"custom" must travel as their dash sentinels
                return Err(TrackRecordError::UnknownTimeRange(s.to_string()));
            }
            Ok(token)
        }
    }
}

/// A fully resolved request: which range was selected and which dates it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeQuery {
    pub token: TimeRangeToken,
    pub range: DateRange,
}

impl RangeQuery {
    pub fn new(token: TimeRangeToken, range: DateRange) -> Self {
        Self { token, range }
    }

    pub fn segment(&self) -> &'static str {
        segment(self.token)
    }

    pub fn start_param(&self) -> String {
        format_date(self.range.start())
    }

    pub fn end_param(&self) -> String {
        format_date(self.range.end())
    }

    /// Query parameters for the proxy endpoints, in request order
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            (START_DATE_PARAM, self.start_param()),
            (END_DATE_PARAM, self.end_param()),
            (TIME_RANGE_PARAM, self.segment().to_string()),
        ]
    }

    /// Positional path on the upstream analytics service, relative to its root:
    /// `analytics/<endpoint>/<metric>/<instrument>/<segment>/<start>/<end>`
    pub fn upstream_path(&self, endpoint: &str, metric: &str, instrument: &str) -> String {
        format!(
            "analytics/{}/{}/{}/{}/{}/{}",
            endpoint,
            metric,
            instrument,
            self.segment(),
            self.start_param(),
            self.end_param()
        )
    }

    /// Rebuild a query from decoded proxy parameters.
    ///
    /// All three parameters are required; unknown segments, malformed dates
    /// and inverted ranges are errors.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, TrackRecordError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut start: Option<NaiveDate> = None;
        let mut end: Option<NaiveDate> = None;
        let mut token: Option<TimeRangeToken> = None;

        for (key, value) in pairs {
            match key {
                START_DATE_PARAM => start = Some(parse_date(value)?),
                END_DATE_PARAM => end = Some(parse_date(value)?),
                TIME_RANGE_PARAM => token = Some(parse_segment(value)?),
                _ => {}
            }
        }

        let start = start.ok_or_else(|| TrackRecordError::InvalidDate(START_DATE_PARAM.into()))?;
        let end = end.ok_or_else(|| TrackRecordError::InvalidDate(END_DATE_PARAM.into()))?;
        let token =
            token.ok_or_else(|| TrackRecordError::UnknownTimeRange(TIME_RANGE_PARAM.into()))?;

        Ok(Self::new(token, DateRange::new(start, end)?))
    }
}
