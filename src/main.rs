//! review-harvester: collect paginated customer reviews into a CSV or JSON file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use review_harvester::utils::{DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_FILE};
use review_harvester::{HarvestConfig, harvest};

#[derive(Parser)]
#[command(
    name = "review-harvester",
    about = "Harvest paginated customer reviews with a headless browser",
    version
)]
struct Cli {
    /// Listing URL; the page index is added as a `page` query parameter.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Highest page index to request.
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Export file; `.json` writes JSON, anything else CSV.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Override the browser user agent.
    #[arg(long)]
    user_agent: Option<String>,

    /// Show the browser window.
    #[arg(long)]
    headed: bool,

    /// Chrome profile directory (temporary by default).
    #[arg(long)]
    chrome_data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "review_harvester=debug,info"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut builder = HarvestConfig::builder()
        .base_url(cli.base_url)
        .output_path(cli.output)
        .max_pages(cli.max_pages)
        .headless(!cli.headed);
    if let Some(user_agent) = cli.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(dir) = cli.chrome_data_dir {
        builder = builder.chrome_data_dir(dir);
    }
    let config = builder.build().context("Invalid harvest configuration")?;

    let report = harvest(&config)
        .await
        .with_context(|| format!("Harvest of {} failed", config.base_url()))?;

    println!(
        "Harvested {} reviews from {} pages ({}) into {}",
        report.records_written,
        report.outcome.pages.len(),
        report.outcome.reason,
        config.output_path().display()
    );

    Ok(())
}
