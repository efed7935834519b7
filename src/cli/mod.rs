use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "trackrecord")]
#[command(
    version,
    about = "Multi-strategy investment track record (US market)"
)]
#[command(
    long_about = "Show the algorithm's performance against SPY and its risk/return statistics for any time range, fetched from the analytics backend."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Query the upstream analytics service directly instead of the proxy
    #[arg(long = "direct", global = true)]
    pub direct: bool,

    /// Path to a config file (defaults to $TRACKRECORD_CONFIG or the user config dir)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a time range and show how it is sent to the backend (offline)
    Range {
        /// Range: actual, 1w, 1m, 3m, 6m, ytd, 1y, 2y, 5y
        token: String,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show the performance chart data
    Chart {
        #[command(flatten)]
        range: RangeArgs,

        /// Number of most recent points to list (0 lists all)
        #[arg(short, long, default_value_t = 20)]
        points: usize,
    },

    /// Show the statistics table
    Table {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Show chart and statistics together
    Show {
        #[command(flatten)]
        range: RangeArgs,

        /// Number of most recent points to list (0 lists all)
        #[arg(short, long, default_value_t = 20)]
        points: usize,
    },
}

/// Range selection shared by the data commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Range: actual, 1w, 1m, 3m, 6m, ytd, 1y, 2y, 5y, custom
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub range: Option<String>,

    /// Custom start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Custom end date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<String>,
}
