mod analysis;
mod config;
mod error;
mod indicator;
mod model;
mod reporter;
mod signal;
mod source;

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use analysis::{AnalysisRequest, AnalysisSettings, Analyzer, run_batch};
use config::AppConfig;
use model::OutputFormat;
use source::PriceSource;
use source::csv_file::CsvPriceSource;

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("analysis error")]
    Analysis,
}

#[derive(Parser)]
#[command(
    name = "stock-signal",
    about = "Technical indicators and buy/sell/hold signals from historical prices"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Analyze a single symbol instead of the configured watchlist
    #[arg(short, long, requires_all = ["from", "to"])]
    symbol: Option<String>,

    /// Start of the range (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "symbol")]
    from: Option<String>,

    /// End of the range (YYYY-MM-DD, exclusive)
    #[arg(long, requires = "symbol")]
    to: Option<String>,

    /// Output format, overrides `output.format` (text | json)
    #[arg(long, value_parser = parse_output_format)]
    format: Option<OutputFormat>,
}

fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("unknown output format \"{s}\""))
}

#[tokio::main]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = config::load(Path::new(&cli.config)).change_context(AppError::Config)?;

    init_tracing(&config);

    let settings = AnalysisSettings::from_config(&config).change_context(AppError::Config)?;
    let source: Arc<dyn PriceSource> =
        Arc::new(CsvPriceSource::new(config.general.data_dir.clone()));
    let analyzer = Arc::new(Analyzer::new(source, settings));

    let requests = build_requests(&cli, &config);
    if requests.is_empty() {
        warn!("watchlist is empty and no --symbol given; nothing to do");
        return Ok(());
    }

    let format = cli.format.unwrap_or_else(|| config.output_format());
    let reporter = reporter::for_format(format);
    let today = Local::now().date_naive();
    let total = requests.len();

    info!(total, %format, data_dir = %config.general.data_dir, "starting analysis");

    let results = run_batch(analyzer, requests, today, config.general.max_concurrency).await;

    let mut succeeded = 0usize;
    for report in results.into_iter().flatten() {
        reporter.report(&report);
        succeeded += 1;
    }

    info!(succeeded, failed = total - succeeded, "analysis complete");

    if succeeded == 0 {
        return Err(Report::new(AppError::Analysis).attach(format!("all {total} analyses failed")));
    }
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    // stdout is reserved for reports
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn build_requests(cli: &Cli, config: &AppConfig) -> Vec<AnalysisRequest> {
    match (&cli.symbol, &cli.from, &cli.to) {
        (Some(symbol), Some(from), Some(to)) => vec![AnalysisRequest {
            symbol: symbol.clone(),
            date_from: from.clone(),
            date_to: to.clone(),
        }],
        _ => config.watchlist.iter().map(AnalysisRequest::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).expect("parse failed")
    }

    const WATCHLIST: &str = r#"
[general]

[[watchlist]]
symbol = "TCS"
date_from = "2024-01-01"
date_to = "2024-06-30"

[[watchlist]]
symbol = "INFY"
date_from = "2024-02-01"
date_to = "2024-07-31"
"#;

    #[test]
    fn cli_symbol_overrides_watchlist() {
        let cli = Cli::parse_from([
            "stock-signal",
            "--symbol",
            "HDFCBANK",
            "--from",
            "2024-03-01",
            "--to",
            "2024-04-01",
        ]);
        let requests = build_requests(&cli, &config(WATCHLIST));
        assert_eq!(
            requests,
            vec![AnalysisRequest {
                symbol: "HDFCBANK".into(),
                date_from: "2024-03-01".into(),
                date_to: "2024-04-01".into(),
            }]
        );
    }

    #[test]
    fn watchlist_used_without_cli_symbol() {
        let cli = Cli::parse_from(["stock-signal", "--config", "other.toml"]);
        assert_eq!(cli.config, "other.toml");
        let requests = build_requests(&cli, &config(WATCHLIST));
        let symbols: Vec<&str> = requests.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TCS", "INFY"]);
    }

    #[test]
    fn symbol_without_range_is_rejected() {
        assert!(Cli::try_parse_from(["stock-signal", "--symbol", "TCS"]).is_err());
        assert!(Cli::try_parse_from(["stock-signal", "--from", "2024-01-01"]).is_err());
    }

    #[test]
    fn format_flag_is_parsed() {
        let cli = Cli::parse_from(["stock-signal", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(Cli::try_parse_from(["stock-signal", "--format", "xml"]).is_err());
    }
}
