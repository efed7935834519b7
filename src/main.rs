mod cli;
mod dispatcher;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use dispatcher::{dispatch_command, Options};
use tracing_subscriber::EnvFilter;
use trackrecord::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so JSON output on stdout stays parseable)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let options = Options {
        json: cli.json,
        direct: cli.direct,
        config: Config::load(cli.config.as_deref())?,
    };

    dispatch_command(cli.command, &options).await
}
