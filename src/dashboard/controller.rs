//! Runs dashboard actions against an analytics source

use chrono::NaiveDate;
use tracing::info;

use super::{Action, Applied, DashboardState, FetchOutcome, FetchRequest, Panels};
use crate::analytics::{load_chart, load_table, AnalyticsApi};
use crate::error::TrackRecordError;

/// Fetch the panels named by `panels` for one request, chart and table
/// concurrently. Failures are captured in the outcome, not returned.
pub async fn execute<A: AnalyticsApi>(api: &A, panels: Panels, request: FetchRequest) -> FetchOutcome {
    let query = request.query;
    let chart = async {
        if panels.chart() {
            Some(load_chart(api, &query).await)
        } else {
            None
        }
    };
    let table = async {
        if panels.table() {
            Some(load_table(api, &query).await)
        } else {
            None
        }
    };
    let (chart, table) = tokio::join!(chart, table);

    FetchOutcome {
        seq: request.seq,
        chart,
        table,
    }
}

/// Owns the dashboard state and the source it fetches from
pub struct Dashboard<A> {
    api: A,
    state: DashboardState,
}

impl<A: AnalyticsApi> Dashboard<A> {
    pub fn new(api: A, today: NaiveDate, panels: Panels) -> Self {
        Self {
            api,
            state: DashboardState::new(today, panels),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Apply an action and, when it triggers a fetch, run it to completion.
    ///
    /// Only input errors (inverted ranges) are returned; fetch failures are
    /// absorbed by the slots.
    pub async fn dispatch(
        &mut self,
        action: Action,
        today: NaiveDate,
    ) -> Result<Option<(Applied, Applied)>, TrackRecordError> {
        let Some(request) = self.state.reduce(action, today)? else {
            return Ok(None);
        };
        info!(
            "Loading {} ({}) for {:?}",
            request.query.range,
            request.query.segment(),
            action
        );
        let outcome = execute(&self.api, self.state.panels, request).await;
        Ok(Some(self.state.complete(outcome)))
    }

    /// Apply a sequence of actions in order
    pub async fn dispatch_all<I>(&mut self, actions: I, today: NaiveDate) -> Result<(), TrackRecordError>
    where
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            self.dispatch(action, today).await?;
        }
        Ok(())
    }
}
