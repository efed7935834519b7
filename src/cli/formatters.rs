//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of fetching and state from presentation.

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde_json::{json, Value};
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use trackrecord::analytics::{ChartData, TableRow};
use trackrecord::dashboard::{DashboardState, Slot};
use trackrecord::range::{RangeQuery, DATE_FORMAT};
use trackrecord::views::{format_update_time, CellTone, ChartSummary};

/// Benchmark column header
pub const BENCHMARK_LABEL: &str = "SPY";

fn toned(value: &str, tone: CellTone, positive: fn(&str) -> ColoredString) -> String {
    match tone {
        CellTone::Positive => positive(value).to_string(),
        CellTone::Negative => value.red().to_string(),
        CellTone::NotApplicable => value.dimmed().to_string(),
    }
}

fn account_color(value: &str) -> ColoredString {
    value.green()
}

fn benchmark_color(value: &str) -> ColoredString {
    value.truecolor(0x95, 0x68, 0xff)
}

fn signed(value: f64) -> String {
    let text = format!("{:.2}", value);
    if value >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format a resolved range and its wire encoding
pub fn format_range(query: &RangeQuery, upstream_path: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{} {}\n\n",
        "📅".cyan().bold(),
        query.token.label().bold()
    ));
    output.push_str(&format!("  {:<12} {}\n", "Start:", query.start_param()));
    output.push_str(&format!("  {:<12} {}\n", "End:", query.end_param()));
    output.push_str(&format!("  {:<12} {}\n", "Days:", query.range.days()));
    output.push_str(&format!("  {:<12} {}\n", "timeRange:", query.segment().cyan()));
    output.push_str(&format!(
        "  {:<12} {}\n",
        "Upstream:",
        upstream_path.bright_black()
    ));
    output
}

pub fn range_json(query: &RangeQuery, upstream_path: &str) -> Value {
    json!({
        "token": query.token,
        "start_date": query.start_param(),
        "end_date": query.end_param(),
        "days": query.range.days(),
        "time_range": query.segment(),
        "upstream_path": upstream_path,
    })
}

/// Header line shared by chart and table output
pub fn format_header(state: &DashboardState) -> String {
    let range = match (state.start, state.end) {
        (Some(s), Some(e)) => format!("{} → {}", s.format(DATE_FORMAT), e.format(DATE_FORMAT)),
        _ => "-".to_string(),
    };
    format!(
        "\n{} Multi Strategy Investment Track Record (US Market)\n  {} {}  {}\n  {}\n",
        "📈".cyan().bold(),
        "Range:".bold(),
        state.effective_token().label(),
        range,
        format_update_time(state.chart.data.update_time.as_deref(), &Local).bright_magenta(),
    )
}

/// Format chart points (most recent `limit`, 0 for all) with a summary
pub fn format_chart(chart: &Slot<ChartData>, limit: usize) -> String {
    let mut output = String::new();

    if let Some(err) = &chart.last_error {
        output.push_str(&format!(
            "\n{} Chart refresh failed, showing previous data: {}\n",
            "⚠".yellow().bold(),
            err
        ));
    }

    let points = &chart.data.points;
    let Some(summary) = ChartSummary::from_points(points) else {
        output.push_str(&format!("\n{} No chart data available\n", "ℹ".blue().bold()));
        return output;
    };

    #[derive(Tabled)]
    struct PointRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "SPY")]
        benchmark: String,
        #[tabled(rename = "Actual")]
        actual: String,
    }

    let skip = if limit == 0 {
        0
    } else {
        points.len().saturating_sub(limit)
    };
    let rows: Vec<PointRow> = points
        .iter()
        .skip(skip)
        .map(|p| PointRow {
            date: p.date.format(DATE_FORMAT).to_string(),
            benchmark: signed(p.benchmark),
            actual: signed(p.actual),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    output.push('\n');
    output.push_str(&table.to_string());
    if skip > 0 {
        output.push_str(&format!("\n... {} earlier points not shown", skip));
    }

    output.push_str(&format!("\n\n{} Summary", "━".repeat(40).bright_black()));
    output.push_str(&format!(
        "\n{:<16} {} → {} ({} points)",
        "Period:".bold(),
        summary.first_date,
        summary.last_date,
        summary.points
    ));
    output.push_str(&format!(
        "\n{:<16} {}",
        format!("{}:", BENCHMARK_LABEL).bold(),
        signed(summary.latest_benchmark)
    ));
    output.push_str(&format!("\n{:<16} {}", "Actual:".bold(), signed(summary.latest_actual)));
    output.push_str(&format!("\n{:<16} {}", "Excess:".bold(), signed(summary.latest_excess())));
    output.push_str(&format!(
        "\n{:<16} {:.2} .. {:.2}\n",
        "Axis:".bold(),
        summary.y_min,
        summary.y_max
    ));
    if chart.data.coerced > 0 {
        output.push_str(&format!(
            "{} {} values could not be parsed and are shown as 0\n",
            "ℹ".blue().bold(),
            chart.data.coerced
        ));
    }

    output
}

/// Format the statistics table, coloring values by sign
pub fn format_stats_table(table_slot: &Slot<Vec<TableRow>>) -> String {
    let mut output = String::new();

    if table_slot.last_error.is_some() {
        output.push_str(&format!(
            "\n{} Statistics unavailable, showing built-in figures\n",
            "⚠".yellow().bold()
        ));
    }

    if table_slot.data.is_empty() {
        output.push_str(&format!("\n{} No statistics available\n", "ℹ".blue().bold()));
        return output;
    }

    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "Statistic")]
        id: String,
        #[tabled(rename = "Account")]
        account: String,
        #[tabled(rename = "SPY")]
        benchmark: String,
    }

    let rows: Vec<StatRow> = table_slot
        .data
        .iter()
        .map(|r| StatRow {
            id: r.id.clone(),
            account: toned(&r.ac, r.account_tone(), account_color),
            benchmark: toned(&r.bm, r.benchmark_tone(), benchmark_color),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    output.push('\n');
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn chart_json(state: &DashboardState) -> Value {
    let chart = &state.chart;
    json!({
        "time_range": state.effective_token(),
        "start_date": state.start,
        "end_date": state.end,
        "update_time": chart.data.update_time,
        "points": chart.data.points,
        "summary": ChartSummary::from_points(&chart.data.points),
        "coerced": chart.data.coerced,
        "error": chart.last_error,
    })
}

pub fn table_json(state: &DashboardState) -> Value {
    json!(state.table.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trackrecord::analytics::{fallback_table, ChartPoint};
    use trackrecord::dashboard::Panels;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_empty_chart_message() {
        plain();
        let msg = format_chart(&Slot::default(), 20);
        assert!(msg.contains("No chart data available"));
    }

    #[test]
    fn test_chart_lists_latest_points() {
        plain();
        let mut slot: Slot<ChartData> = Slot::default();
        slot.data.points = (1..=5)
            .map(|d| ChartPoint {
                date: NaiveDate::from_ymd_opt(2025, 9, d).unwrap(),
                benchmark: d as f64,
                actual: -(d as f64),
            })
            .collect();
        let out = format_chart(&slot, 2);
        assert!(out.contains("2025-09-05"));
        assert!(out.contains("2025-09-04"));
        assert!(!out.contains("2025-09-03 "));
        assert!(out.contains("3 earlier points not shown"));
        assert!(out.contains("-10.00"));
    }

    #[test]
    fn test_stats_table_shows_every_row() {
        plain();
        let mut slot: Slot<Vec<TableRow>> = Slot::default();
        slot.data = fallback_table();
        let out = format_stats_table(&slot);
        assert!(out.contains("Sharpe Ratio"));
        assert!(out.contains("Dividend Yield"));
        assert!(!out.contains("\u{001b}["));
    }

    #[test]
    fn test_table_json_is_plain_rows() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 12).unwrap();
        let mut state = DashboardState::new(today, Panels::Table);
        let req = state
            .reduce(trackrecord::dashboard::Action::Mount, today)
            .unwrap()
            .unwrap();
        state.apply_table(req.seq, Ok(vec![TableRow::new("Beta", "1.925", "1.000")]));
        assert_eq!(
            table_json(&state),
            json!([{"id": "Beta", "ac": "1.925", "bm": "1.000"}])
        );
    }

    #[test]
    fn test_chart_json_reports_stale_error() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 12).unwrap();
        let mut state = DashboardState::new(today, Panels::Chart);
        let req = state
            .reduce(trackrecord::dashboard::Action::Mount, today)
            .unwrap()
            .unwrap();
        state.apply_chart(req.seq, Err(anyhow::anyhow!("connection refused")));

        let value = chart_json(&state);
        assert_eq!(value["time_range"], "actual");
        assert_eq!(value["start_date"], "2020-03-31");
        assert_eq!(value["points"], json!([]));
        assert_eq!(value["summary"], Value::Null);
        assert_eq!(value["error"], "connection refused");
        assert!(value.get("issued").is_none());
    }
}
