//! Error handling for trackrecord
//!
//! Defines the typed errors raised at input and transport boundaries and
//! a unified Result type using anyhow for context chaining.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error types for range resolution and analytics fetches
#[derive(Error, Debug)]
pub enum TrackRecordError {
    #[error("unknown time range '{0}' (expected actual, 1w, 1m, 3m, 6m, ytd, 1y, 2y, 5y or custom)")]
    UnknownTimeRange(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("analytics service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fetch and CLI operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = TrackRecordError::Status(502);
        assert_eq!(err.to_string(), "analytics service returned status 502");
    }

    #[test]
    fn test_inverted_range_names_both_dates() {
        let err = TrackRecordError::InvertedRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "start date 2025-03-01 is after end date 2025-02-01"
        );
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(TrackRecordError::MalformedResponse("no data".into()))
            .context("failed to load chart");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to load chart"));
        assert!(format!("{:?}", err).contains("no data"));
    }
}
