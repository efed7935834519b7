//! Dashboard state and transitions
//!
//! [`DashboardState`] holds everything the views show: the selected range,
//! the two date fields, the custom-dates flag and one display slot per
//! panel. It changes only through [`DashboardState::reduce`] (user actions)
//! and [`DashboardState::complete`] (fetch outcomes).
//!
//! Every fetch carries a sequence number. A slot remembers the newest
//! sequence it has settled and ignores anything older, so a slow request
//! can never overwrite the result of a later one.

pub mod controller;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::analytics::{fallback_table, ChartData, TableRow};
use crate::error::TrackRecordError;
use crate::range::{resolve, DateRange, RangeQuery, TimeRangeToken, INCEPTION_DATE};

pub use controller::{execute, Dashboard};

/// User interactions that drive the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Initial load with the default range
    Mount,
    /// Pick a range from the selector
    SelectRange(TimeRangeToken),
    /// Type into the start date field (`None` clears it)
    EditStartDate(Option<NaiveDate>),
    /// Type into the end date field (`None` clears it)
    EditEndDate(Option<NaiveDate>),
    /// Explicit "go" with the current fields
    Refresh,
}

/// Which panels a dashboard fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panels {
    Chart,
    Table,
    #[default]
    Both,
}

impl Panels {
    pub fn chart(&self) -> bool {
        matches!(self, Panels::Chart | Panels::Both)
    }

    pub fn table(&self) -> bool {
        matches!(self, Panels::Table | Panels::Both)
    }
}

/// A fetch the controller must run on behalf of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: RangeQuery,
}

/// Completed fetch for one request. A panel that was not fetched is `None`.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub chart: Option<crate::error::Result<ChartData>>,
    pub table: Option<crate::error::Result<Vec<TableRow>>>,
}

/// What happened when an outcome reached a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New data replaced the slot contents
    Updated,
    /// The fetch failed; the slot kept its previous data
    KeptStale,
    /// The fetch failed; the slot now shows built-in data
    Fallback,
    /// A newer request already settled this slot
    Discarded,
    /// This panel was not part of the request
    Skipped,
}

/// Data shown by one panel plus its request bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Slot<T> {
    pub data: T,
    pub last_error: Option<String>,
    issued: u64,
    settled: u64,
}

impl<T> Slot<T> {
    /// True while a request newer than the last settled one is outstanding
    pub fn loading(&self) -> bool {
        self.issued > self.settled
    }

    fn issue(&mut self, seq: u64) {
        self.issued = self.issued.max(seq);
    }

    /// Claim `seq` for settlement; false when a newer request already settled
    fn settle(&mut self, seq: u64) -> bool {
        if seq <= self.settled {
            return false;
        }
        self.settled = seq;
        true
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub selected: TimeRangeToken,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub custom_dates: bool,
    pub panels: Panels,
    pub chart: Slot<ChartData>,
    pub table: Slot<Vec<TableRow>>,
    next_seq: u64,
}

impl DashboardState {
    /// Initial state: "actual" from inception to `today`
    pub fn new(today: NaiveDate, panels: Panels) -> Self {
        Self {
            selected: TimeRangeToken::Actual,
            start: Some(INCEPTION_DATE.min(today)),
            end: Some(today),
            custom_dates: false,
            panels,
            chart: Slot::default(),
            table: Slot::default(),
            next_seq: 1,
        }
    }

    /// Token sent with requests: hand-edited dates always travel as "custom"
    pub fn effective_token(&self) -> TimeRangeToken {
        if self.custom_dates {
            TimeRangeToken::Custom
        } else {
            self.selected
        }
    }

    /// Query for the current fields. Cleared dates fall back to the
    /// inception date (or `today`, if earlier) and `today`.
    pub fn current_query(&self, today: NaiveDate) -> Result<RangeQuery, TrackRecordError> {
        let start = self.start.unwrap_or(INCEPTION_DATE.min(today));
        let end = self.end.unwrap_or(today);
        Ok(RangeQuery::new(self.effective_token(), DateRange::new(start, end)?))
    }

    /// Apply a user action. Returns the fetch it triggers, if any.
    pub fn reduce(
        &mut self,
        action: Action,
        today: NaiveDate,
    ) -> Result<Option<FetchRequest>, TrackRecordError> {
        match action {
            Action::Mount | Action::Refresh => self.begin_fetch(today).map(Some),
            Action::SelectRange(token) => {
                self.selected = token;
                let Some(range) = resolve(token, today) else {
                    // custom keeps whatever is in the date fields
                    return Ok(None);
                };
                self.custom_dates = false;
                self.start = Some(range.start());
                self.end = Some(range.end());
                self.begin_fetch(today).map(Some)
            }
            Action::EditStartDate(date) => {
                self.start = date;
                self.custom_dates = true;
                Ok(None)
            }
            Action::EditEndDate(date) => {
                self.end = date;
                self.custom_dates = true;
                Ok(None)
            }
        }
    }

    fn begin_fetch(&mut self, today: NaiveDate) -> Result<FetchRequest, TrackRecordError> {
        let query = self.current_query(today)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.panels.chart() {
            self.chart.issue(seq);
        }
        if self.panels.table() {
            self.table.issue(seq);
        }
        debug!("Issued request #{} for {} ({})", seq, query.range, query.segment());
        Ok(FetchRequest { seq, query })
    }

    /// Apply a finished fetch to both slots
    pub fn complete(&mut self, outcome: FetchOutcome) -> (Applied, Applied) {
        let chart = match outcome.chart {
            Some(result) => self.apply_chart(outcome.seq, result),
            None => Applied::Skipped,
        };
        let table = match outcome.table {
            Some(result) => self.apply_table(outcome.seq, result),
            None => Applied::Skipped,
        };
        (chart, table)
    }

    /// Chart failures leave the previous points on screen
    pub fn apply_chart(&mut self, seq: u64, result: crate::error::Result<ChartData>) -> Applied {
        if !self.chart.settle(seq) {
            debug!("Discarding stale chart result #{}", seq);
            return Applied::Discarded;
        }
        match result {
            Ok(data) => {
                self.chart.data = data;
                self.chart.last_error = None;
                Applied::Updated
            }
            Err(e) => {
                warn!("Error fetching chart data: {:#}", e);
                self.chart.last_error = Some(format!("{:#}", e));
                Applied::KeptStale
            }
        }
    }

    /// Table failures substitute the built-in statistics
    pub fn apply_table(
        &mut self,
        seq: u64,
        result: crate::error::Result<Vec<TableRow>>,
    ) -> Applied {
        if !self.table.settle(seq) {
            debug!("Discarding stale table result #{}", seq);
            return Applied::Discarded;
        }
        match result {
            Ok(rows) => {
                self.table.data = rows;
                self.table.last_error = None;
                Applied::Updated
            }
            Err(e) => {
                warn!("Error fetching table data, showing built-in statistics: {:#}", e);
                self.table.data = fallback_table();
                self.table.last_error = Some(format!("{:#}", e));
                Applied::Fallback
            }
        }
    }
}
