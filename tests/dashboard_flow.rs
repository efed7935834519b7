use anyhow::anyhow;
use chrono::NaiveDate;
use serde_json::json;
use std::cell::{Cell, RefCell};

use trackrecord::analytics::{AnalyticsApi, ChartPayload, TableRow, FALLBACK_ROW_COUNT};
use trackrecord::dashboard::{execute, Action, Applied, Dashboard, DashboardState, Panels};
use trackrecord::error::{Result, TrackRecordError};
use trackrecord::range::{RangeQuery, TimeRangeToken};

/// In-memory source that can be switched into a failing state
#[derive(Default)]
struct FakeApi {
    failing: Cell<bool>,
    calls: Cell<usize>,
    queries: RefCell<Vec<RangeQuery>>,
}

impl FakeApi {
    fn record(&self, query: &RangeQuery) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        self.queries.borrow_mut().push(*query);
        if self.failing.get() {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

impl AnalyticsApi for FakeApi {
    async fn fetch_chart(&self, query: &RangeQuery) -> Result<ChartPayload> {
        self.record(query)?;
        let payload = serde_json::from_value(json!({
            "data": [
                {"dt": query.start_param(), "bm": "0", "ac": "0"},
                {"dt": query.end_param(), "bm": "12.5", "ac": "30.25"}
            ],
            "updateTime": "2025-03-31T16:00:00Z"
        }))?;
        Ok(payload)
    }

    async fn fetch_table(&self, query: &RangeQuery) -> Result<Vec<TableRow>> {
        self.record(query)?;
        Ok(vec![TableRow::new("Beta", "1.925", "1.000")])
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn failed_refresh_keeps_previous_chart_and_falls_back_table() {
    let today = date(2025, 3, 31);
    let mut dashboard = Dashboard::new(FakeApi::default(), today, Panels::Both);

    let first = dashboard.dispatch(Action::Mount, today).await.unwrap();
    assert_eq!(first, Some((Applied::Updated, Applied::Updated)));
    assert_eq!(dashboard.state().chart.data.points.len(), 2);
    assert_eq!(dashboard.state().table.data.len(), 1);

    dashboard.api().failing.set(true);
    let second = dashboard
        .dispatch(Action::SelectRange(TimeRangeToken::OneYear), today)
        .await
        .unwrap();
    assert_eq!(second, Some((Applied::KeptStale, Applied::Fallback)));

    let state = dashboard.state();
    assert_eq!(state.selected, TimeRangeToken::OneYear);
    assert_eq!(state.start, Some(date(2024, 3, 31)));
    // points from the inception-to-date load are still shown
    assert_eq!(state.chart.data.points[0].date, date(2020, 3, 31));
    assert!(state
        .chart
        .last_error
        .as_deref()
        .is_some_and(|e| e.contains("connection refused")));
    assert_eq!(state.table.data.len(), FALLBACK_ROW_COUNT);
    assert!(!state.chart.loading());
    assert!(!state.table.loading());
}

#[tokio::test]
async fn older_response_arriving_late_is_discarded() {
    let today = date(2025, 3, 31);
    let api = FakeApi::default();
    let mut state = DashboardState::new(today, Panels::Both);

    let older = state
        .reduce(Action::SelectRange(TimeRangeToken::FiveYears), today)
        .unwrap()
        .unwrap();
    let newer = state
        .reduce(Action::SelectRange(TimeRangeToken::OneWeek), today)
        .unwrap()
        .unwrap();
    assert!(newer.seq > older.seq);
    assert!(state.chart.loading());

    let newer_outcome = execute(&api, state.panels, newer).await;
    let older_outcome = execute(&api, state.panels, older).await;

    assert_eq!(
        state.complete(newer_outcome),
        (Applied::Updated, Applied::Updated)
    );
    assert_eq!(
        state.complete(older_outcome),
        (Applied::Discarded, Applied::Discarded)
    );

    // the one-week range is what remains on screen
    assert_eq!(state.chart.data.points[0].date, date(2025, 3, 24));
    assert!(!state.chart.loading());
}

#[tokio::test]
async fn manual_dates_wait_for_refresh_and_travel_as_custom() {
    let today = date(2025, 3, 31);
    let mut dashboard = Dashboard::new(FakeApi::default(), today, Panels::Chart);

    let edits = dashboard
        .dispatch(Action::EditStartDate(Some(date(2024, 6, 1))), today)
        .await
        .unwrap();
    assert_eq!(edits, None);
    assert_eq!(dashboard.api().calls.get(), 0);

    dashboard
        .dispatch_all(
            [Action::EditEndDate(Some(date(2024, 12, 31))), Action::Refresh],
            today,
        )
        .await
        .unwrap();

    let queries = dashboard.api().queries.borrow();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].token, TimeRangeToken::Custom);
    assert_eq!(queries[0].segment(), "---");
    assert_eq!(queries[0].start_param(), "2024-06-01");
    assert_eq!(queries[0].end_param(), "2024-12-31");
}

#[tokio::test]
async fn inverted_dates_are_rejected_before_fetching() {
    let today = date(2025, 3, 31);
    let mut dashboard = Dashboard::new(FakeApi::default(), today, Panels::Both);

    let err = dashboard
        .dispatch_all(
            [
                Action::EditStartDate(Some(date(2025, 5, 1))),
                Action::EditEndDate(Some(date(2025, 4, 1))),
                Action::Refresh,
            ],
            today,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TrackRecordError::InvertedRange { .. }));
    assert_eq!(dashboard.api().calls.get(), 0);
    assert!(!dashboard.state().chart.loading());
}
