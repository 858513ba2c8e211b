//! webtimer main entry point
//!
//! This is the command-line interface for measuring page resource download times.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webtimer::config::{load_config, validate, Config, ErrorPolicy};
use webtimer::crawler::CrawlEngine;
use webtimer::output::{format_json_report, format_text_report, TimingReport};

/// webtimer: Measure download times for all resources on a webpage
///
/// Fetches the page, then every script, stylesheet and image it links to,
/// and reports the time each download took, per URL and per asset type.
#[derive(Parser, Debug)]
#[command(name = "webtimer")]
#[command(version)]
#[command(about = "Measure download times for all resources on a webpage", long_about = None)]
struct Cli {
    /// URL of the page to measure
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of downloads in flight at once (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-download timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum number of downloads (overrides config)
    #[arg(long)]
    max_resources: Option<usize>,

    /// Stop at the first failed download instead of skipping it
    #[arg(long)]
    abort_on_error: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let mut engine = CrawlEngine::from_config(&config).context("Failed to build HTTP client")?;
    let report = match engine.evaluate(&cli.url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Measurement failed: {}", e);
            if let Some(partial) = e.partial_report() {
                print_report(partial, cli.format)?;
            }
            return Err(e).with_context(|| format!("Failed to measure {}", cli.url));
        }
    };

    print_report(&report, cli.format)?;

    if !report.failures().is_empty() {
        tracing::warn!("{} downloads failed", report.failures().len());
    }

    Ok(())
}

/// Writes the report to stdout in the requested format
fn print_report(report: &TimingReport, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => print!("{}", format_text_report(report)),
        Format::Json => println!("{}", format_json_report(report)?),
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webtimer=info,warn"),
            1 => EnvFilter::new("webtimer=debug,info"),
            2 => EnvFilter::new("webtimer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if cli.max_resources.is_some() {
        config.crawler.max_resources = cli.max_resources;
    }
    if cli.abort_on_error {
        config.crawler.on_error = ErrorPolicy::Abort;
    }

    validate(&config).context("Invalid settings")?;

    Ok(config)
}
