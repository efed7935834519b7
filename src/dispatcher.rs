//! Command dispatcher that routes parsed CLI commands to the dashboard and
//! the output formatters.

use anyhow::{anyhow, Result};
use tracing::info;

use crate::cli::formatters;
use crate::cli::runner::{resolve_today, to_actions};
use crate::cli::{Commands, RangeArgs};
use crate::ui::progress::Spinner;
use trackrecord::analytics::proxy::ProxyClient;
use trackrecord::analytics::upstream::UpstreamClient;
use trackrecord::analytics::AnalyticsApi;
use trackrecord::config::Config;
use trackrecord::dashboard::{Dashboard, Panels};
use trackrecord::range::{resolve, RangeQuery, TimeRangeToken};

/// Options shared by every command
pub struct Options {
    pub json: bool,
    pub direct: bool,
    pub config: Config,
}

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Commands, opts: &Options) -> Result<()> {
    match command {
        Commands::Range { token, today } => dispatch_range(&token, today.as_deref(), opts),
        Commands::Chart { range, points } => {
            dispatch_dashboard(&range, Panels::Chart, points, opts).await
        }
        Commands::Table { range } => dispatch_dashboard(&range, Panels::Table, 0, opts).await,
        Commands::Show { range, points } => {
            dispatch_dashboard(&range, Panels::Both, points, opts).await
        }
    }
}

fn dispatch_range(raw: &str, today: Option<&str>, opts: &Options) -> Result<()> {
    let today = resolve_today(today)?;
    let token: TimeRangeToken = raw.parse()?;
    let range = resolve(token, today).ok_or_else(|| {
        anyhow!("'custom' has no fixed dates; pass --from/--to to the chart or table commands")
    })?;
    let query = RangeQuery::new(token, range);

    let upstream = &opts.config.upstream;
    let path = query.upstream_path(&upstream.chart_endpoint, &upstream.metric, &upstream.instrument);

    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&formatters::range_json(&query, &path))?
        );
    } else {
        print!("{}", formatters::format_range(&query, &path));
    }
    Ok(())
}

async fn dispatch_dashboard(
    args: &RangeArgs,
    panels: Panels,
    points: usize,
    opts: &Options,
) -> Result<()> {
    let today = resolve_today(args.today.as_deref())?;
    let actions = to_actions(args)?;

    if opts.direct {
        let api = UpstreamClient::new(&opts.config)?;
        run_dashboard(api, today, panels, actions, points, opts).await
    } else {
        let api = ProxyClient::new(&opts.config)?;
        run_dashboard(api, today, panels, actions, points, opts).await
    }
}

async fn run_dashboard<A: AnalyticsApi>(
    api: A,
    today: chrono::NaiveDate,
    panels: Panels,
    actions: Vec<trackrecord::dashboard::Action>,
    points: usize,
    opts: &Options,
) -> Result<()> {
    let mut dashboard = Dashboard::new(api, today, panels);

    let spinner = Spinner::start("Loading track record...", !opts.json);
    let result = dashboard.dispatch_all(actions, today).await;
    spinner.finish();
    result?;

    let state = dashboard.state();
    info!(
        "Dashboard settled: {} chart points, {} statistics",
        state.chart.data.points.len(),
        state.table.data.len()
    );

    if opts.json {
        let payload = match panels {
            Panels::Chart => formatters::chart_json(state),
            Panels::Table => formatters::table_json(state),
            Panels::Both => serde_json::json!({
                "chart": formatters::chart_json(state),
                "table": formatters::table_json(state),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print!("{}", formatters::format_header(state));
    if panels.chart() {
        print!("{}", formatters::format_chart(&state.chart, points));
    }
    if panels.table() {
        print!("{}", formatters::format_stats_table(&state.table));
    }
    println!();
    Ok(())
}
