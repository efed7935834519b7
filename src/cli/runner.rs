use anyhow::Result;
use chrono::NaiveDate;

use crate::cli::RangeArgs;
use trackrecord::dashboard::Action;
use trackrecord::range::{local_today, parse_date, TimeRangeToken};

/// Resolve `--today`, falling back to the local calendar date
pub fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(local_today()),
    }
}

/// Translate range flags into the dashboard actions a user would perform:
/// typed dates are manual edits followed by "go", `--range` is a selection,
/// and no flags is the initial page load.
pub fn to_actions(args: &RangeArgs) -> Result<Vec<Action>> {
    if args.from.is_some() || args.to.is_some() {
        let mut actions = Vec::new();
        if let Some(from) = args.from.as_deref() {
            actions.push(Action::EditStartDate(Some(parse_date(from)?)));
        }
        if let Some(to) = args.to.as_deref() {
            actions.push(Action::EditEndDate(Some(parse_date(to)?)));
        }
        actions.push(Action::Refresh);
        return Ok(actions);
    }

    match args.range.as_deref() {
        Some(raw) => {
            let token: TimeRangeToken = raw.parse()?;
            let mut actions = vec![Action::SelectRange(token)];
            if token == TimeRangeToken::Custom {
                // selecting custom alone does not load anything
                actions.push(Action::Refresh);
            }
            Ok(actions)
        }
        None => Ok(vec![Action::Mount]),
    }
}
