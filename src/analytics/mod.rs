//! Analytics data fetch adapter
//!
//! [`AnalyticsApi`] is the transport seam: it returns raw payloads from either
//! the internal proxy ([`proxy::ProxyClient`]) or the upstream service
//! ([`upstream::UpstreamClient`]). [`load_chart`] and [`load_table`] turn
//! those payloads into display-ready data.

pub mod fallback;
pub mod models;
pub mod proxy;
pub mod upstream;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TrackRecordError};
use crate::range::RangeQuery;

pub use fallback::{fallback_table, FALLBACK_ROW_COUNT};
pub use models::{ChartData, ChartPayload, ChartPoint, RawChartRecord, TableRow};

/// Source of chart and table payloads for a resolved range
#[allow(async_fn_in_trait)]
pub trait AnalyticsApi {
    async fn fetch_chart(&self, query: &RangeQuery) -> Result<ChartPayload>;

    async fn fetch_table(&self, query: &RangeQuery) -> Result<Vec<TableRow>>;
}

/// Fetch and normalize chart data
pub async fn load_chart<A: AnalyticsApi>(api: &A, query: &RangeQuery) -> Result<ChartData> {
    let payload = api
        .fetch_chart(query)
        .await
        .context("Error fetching chart data")?;
    normalize_chart(payload)
}

/// Fetch table rows. Rows are already formatted upstream and pass through as-is.
pub async fn load_table<A: AnalyticsApi>(api: &A, query: &RangeQuery) -> Result<Vec<TableRow>> {
    api.fetch_table(query)
        .await
        .context("Error fetching table data")
}

/// Map upstream records to chart points.
///
/// Unparseable return values become zero and are counted in
/// [`ChartData::coerced`]; an unparseable date fails the whole payload.
pub fn normalize_chart(payload: ChartPayload) -> Result<ChartData> {
    let mut coerced = 0;
    let mut points = Vec::with_capacity(payload.data.len());

    for (index, record) in payload.data.into_iter().enumerate() {
        let date = parse_record_date(&record.dt).ok_or_else(|| {
            TrackRecordError::MalformedResponse(format!(
                "record {} has an invalid date: {}",
                index, record.dt
            ))
        })?;

        let mut number = |value: &Value| {
            parse_return(value).unwrap_or_else(|| {
                coerced += 1;
                0.0
            })
        };
        let benchmark = number(&record.bm);
        let actual = number(&record.ac);

        points.push(ChartPoint {
            date,
            benchmark,
            actual,
        });
    }

    if coerced > 0 {
        debug!("{} chart values could not be parsed and were set to 0", coerced);
    }

    Ok(ChartData {
        points,
        update_time: payload.update_time,
        coerced,
    })
}

/// Parse a return value sent either as a JSON number or as a numeric string.
/// Non-finite results count as failures.
pub fn parse_return(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_leading_float(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parse the longest numeric prefix of `s` ("12.5%" -> 12.5), skipping
/// leading whitespace. Returns `None` when no prefix is a finite number.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // exponent only counts when it has digits ("1e3x" but not "1ex")
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Truncate an upstream timestamp to its UTC calendar day.
///
/// Accepts epoch milliseconds, RFC 3339 timestamps, naive date-times and
/// plain `YYYY-MM-DD` dates.
pub fn parse_record_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc).date_naive());
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt.date());
                }
            }
            NaiveDate::parse_from_str(s, crate::range::DATE_FORMAT).ok()
        }
        _ => None,
    }
}

/// Send a prepared GET and decode its JSON body, failing on non-2xx statuses
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", what))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TrackRecordError::Status(status.as_u16()))
            .with_context(|| format!("{} request failed", what));
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to parse {} response", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(data: Value) -> ChartPayload {
        serde_json::from_value(json!({ "data": data, "updateTime": "1757692800000" })).unwrap()
    }

    #[test]
    fn test_normalize_maps_each_record() {
        let data = normalize_chart(payload(json!([
            {"dt": "2025-09-11T00:00:00.000Z", "bm": "1.25", "ac": "-0.5"},
            {"dt": 1757635200000i64, "bm": 2.0, "ac": 3}
        ])))
        .unwrap();

        assert_eq!(data.points.len(), 2);
        assert_eq!(
            data.points[0],
            ChartPoint {
                date: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
                benchmark: 1.25,
                actual: -0.5,
            }
        );
        assert_eq!(data.points[1].date, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap());
        assert_eq!(data.points[1].actual, 3.0);
        assert_eq!(data.update_time.as_deref(), Some("1757692800000"));
        assert_eq!(data.coerced, 0);
    }

    #[test]
    fn test_normalize_coerces_bad_numbers_to_zero() {
        let data = normalize_chart(payload(json!([
            {"dt": "2025-01-02", "bm": "n/a", "ac": null},
            {"dt": "2025-01-03", "bm": "4.5%", "ac": ""}
        ])))
        .unwrap();

        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[0].benchmark, 0.0);
        assert_eq!(data.points[0].actual, 0.0);
        assert_eq!(data.points[1].benchmark, 4.5);
        assert_eq!(data.coerced, 3);
    }

    #[test]
    fn test_normalize_rejects_bad_dates() {
        let result = normalize_chart(payload(json!([{"dt": "yesterday", "bm": 1, "ac": 1}])));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_date_is_truncated_in_utc() {
        let d = parse_record_date(&json!("2025-03-31T23:30:00-05:00")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let d = parse_record_date(&json!("2025-03-31 08:00:00")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert!(parse_record_date(&json!(true)).is_none());
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("0.644"), Some(0.644));
        assert_eq!(parse_leading_float("  -63.781 "), Some(-63.781));
        assert_eq!(parse_leading_float("12abc"), Some(12.0));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("inf"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float(".5%"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("+2.5E-1 pts"), Some(0.25));
        assert_eq!(parse_leading_float("7e"), Some(7.0));
        assert_eq!(parse_leading_float("-.x"), None);
        assert_eq!(parse_leading_float("1e999"), None);
    }

    #[test]
    fn test_parse_leading_float_long_input() {
        let long = format!("3.5{}", "x".repeat(40_000));
        assert_eq!(parse_leading_float(&long), Some(3.5));
        let digits = "9".repeat(300);
        assert_eq!(parse_leading_float(&digits), digits.parse::<f64>().ok());
    }

    #[test]
    fn test_parse_return_rejects_non_numeric_json() {
        assert_eq!(parse_return(&json!(1.5)), Some(1.5));
        assert_eq!(parse_return(&json!("NaN")), None);
        assert_eq!(parse_return(&json!([1])), None);
    }
}
