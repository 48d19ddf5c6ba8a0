mod config;
mod delivery;
mod models;
pub mod render;
pub mod scraping;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

pub use config::{AppConfig, OutputFormat};
pub use delivery::{Delivery, StdoutDelivery};
pub use models::{Event, Session};
use scraping::{base::HttpPageSource, PageSource, ScrapePipeline};

#[derive(Parser)]
#[command(name = "ticket-scrape")]
#[command(about = "Lists Ticketline sessions for a search query as a checklist")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <data dir>/ticket-scrape/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format, overrides the config file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Search query, overrides the config file
    #[arg(short, long)]
    query: Option<String>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn init_tracing(level: &LogLevel) {
    // html5ever and selectors are very chatty below info
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Scrapes `config.query` through `source` and hands the rendered document to
/// `delivery`. Nothing is delivered unless the whole scrape succeeds.
pub fn scrape_and_deliver(
    source: &dyn PageSource,
    config: &AppConfig,
    delivery: &dyn Delivery,
) -> Result<()> {
    let events = ScrapePipeline::new(source, &config.base_url)
        .run(&config.query)
        .with_context(|| format!("scrape failed for query {:?}", config.query))?;
    let sessions: usize = events.iter().map(|event| event.sessions.len()).sum();
    tracing::info!(events = events.len(), sessions, "scrape complete");
    let document = render::render(&events, config.format).context("unable to render events")?;
    delivery.deliver(&document, config.format)
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let path = cli.config.unwrap_or_else(utils::config_path);
    let mut config = AppConfig::load(&path)?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(query) = cli.query {
        anyhow::ensure!(!query.trim().is_empty(), "query must not be empty");
        config.query = query;
    }

    let source = HttpPageSource::new(&config)?;
    scrape_and_deliver(&source, &config, &StdoutDelivery)
}
