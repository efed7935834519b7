//! Presentation helpers shared by every output format
//!
//! Nothing here talks to the network: these functions only decide how
//! already-fetched chart points and table rows are shown.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::analytics::{parse_leading_float, ChartPoint, TableRow};

/// Padding added above and below the data on the chart's value axis,
/// as a fraction of the data span
pub const Y_AXIS_PADDING: f64 = 0.35;

/// How a statistics cell is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Positive,
    Negative,
    NotApplicable,
}

/// Tone of a display value: non-negative numbers are positive, negative
/// numbers and unparseable text are negative.
pub fn tone(value: &str) -> CellTone {
    match parse_leading_float(value) {
        Some(n) if n >= 0.0 => CellTone::Positive,
        _ => CellTone::Negative,
    }
}

impl TableRow {
    pub fn account_tone(&self) -> CellTone {
        tone(&self.ac)
    }

    pub fn benchmark_tone(&self) -> CellTone {
        if self.benchmark_not_applicable() {
            CellTone::NotApplicable
        } else {
            tone(&self.bm)
        }
    }
}

/// Value-axis bounds covering both series with padding, `None` without data
pub fn y_axis_domain(points: &[ChartPoint]) -> Option<(f64, f64)> {
    let values = points
        .iter()
        .flat_map(|p| [p.benchmark, p.actual])
        .filter(|v| v.is_finite());

    let (min, max) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let buffer = (max - min) * Y_AXIS_PADDING;
    Some((min - buffer, max + buffer))
}

/// Headline numbers for a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub points: usize,
    pub latest_benchmark: f64,
    pub latest_actual: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartSummary {
    pub fn from_points(points: &[ChartPoint]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        let (y_min, y_max) = y_axis_domain(points)?;
        Some(Self {
            first_date: first.date,
            last_date: last.date,
            points: points.len(),
            latest_benchmark: last.benchmark,
            latest_actual: last.actual,
            y_min,
            y_max,
        })
    }

    /// Difference between the account and the benchmark on the last point
    pub fn latest_excess(&self) -> f64 {
        self.latest_actual - self.latest_benchmark
    }
}

/// Caption for the data refresh time, e.g. `September 12, 2025 at 4:00 PM +00:00`.
///
/// `timestamp` is epoch milliseconds as sent by the chart endpoint.
pub fn format_update_time<Tz>(timestamp: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(raw) = timestamp else {
        return "Loading...".to_string();
    };
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| {
            utc.with_timezone(tz)
                .format("%B %-d, %Y at %-I:%M %p %:z")
                .to_string()
        })
        .unwrap_or_else(|| "Invalid Date".to_string())
}
