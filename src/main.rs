//! PowerPlanner command-line client.
//!
//! Logs in to the KEPCO PowerPlanner portal and prints the account's usage
//! data as one line of JSON on stdout. Logs go to stderr.
//!
//! # Exit codes
//!
//! - `0` success
//! - `1` usage, configuration or output error
//! - `2` portal layout changed
//! - `3` credential encryption failed
//! - `4` network failure
//! - `5` login rejected
//! - `6` response was not JSON (usually an expired session)
//! - `7` data endpoint returned an error status

use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::Parser;
use powerplanner::config;
use powerplanner::error::Result;
use powerplanner::kepco::Scraper;
use powerplanner::model::{Credentials, Mode, PowerSummary, TranslatedRecord, UsageQuery};
use std::process::ExitCode;

/// Fetch power usage from the KEPCO PowerPlanner portal.
#[derive(Parser, Debug)]
#[command(name = "powerplanner", version)]
struct Cli {
    /// Customer number or KEPCO ON account id
    user_id: String,

    /// PowerPlanner password
    password: String,

    /// Date to query (YYYY-MM-DD), defaults to today; ignored in simple mode
    date: Option<NaiveDate>,

    /// Which data to fetch: "simple" (real-time summary) or "detailed"
    /// (quarter-hour series for the date)
    #[arg(long, default_value_t = Mode::Simple)]
    mode: Mode,

    /// Print derived headline figures instead of the full record (simple
    /// mode only)
    #[arg(long)]
    summary: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let app_config = match config::load_app_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Scrape failed: {:?}", err);
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

/// Runs one scrape and renders the JSON to print.
async fn run(cli: Cli) -> Result<String> {
    if cli.summary && cli.mode == Mode::Detailed {
        return Err(anyhow!("--summary only applies to --mode simple").into());
    }

    let portal_config = config::load_portal_config()?;
    let scraper = Scraper::new(portal_config)?;

    let credentials = Credentials::new(cli.user_id, cli.password);
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let query = UsageQuery::new(date, cli.mode);

    let record = scraper.scrape(&credentials, &query).await?;
    Ok(render(&record, cli.summary, cli.pretty)?)
}

fn render(record: &TranslatedRecord, summary: bool, pretty: bool) -> anyhow::Result<String> {
    let value = match record {
        TranslatedRecord::Summary(data) if summary => {
            serde_json::to_value(PowerSummary::from_record(data))?
        }
        _ => serde_json::to_value(record)?,
    };

    if pretty {
        serde_json::to_string_pretty(&value).context("Failed to render JSON")
    } else {
        serde_json::to_string(&value).context("Failed to render JSON")
    }
}
