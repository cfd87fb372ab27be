//! politifact-links main entry point
//!
//! Command-line interface for the PolitiFact link harvester.

use anyhow::Context;
use clap::Parser;
use politifact_links::config::{compute_config_hash, load_config, validate, Config};
use politifact_links::crawler::run_crawl;
use politifact_links::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// politifact-links: harvest personality and fact-check links from PolitiFact
///
/// Walks every configured listing until its pages run out or the page
/// limit is hit, keeps English fact-checks only, and writes the
/// deduplicated personality and article links to two CSV files.
#[derive(Parser, Debug)]
#[command(name = "politifact-links")]
#[command(version)]
#[command(about = "Politifact Link Extractor", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Script output location
    #[arg(long = "save_path", alias = "save-path", value_name = "DIR")]
    save_path: Option<String>,

    /// Page limit for scraping each listing
    #[arg(long = "page_limit", alias = "page-limit", value_name = "N")]
    page_limit: Option<u32>,

    /// Also keep links found on the last page of each listing
    #[arg(long)]
    merge_last_page: bool,

    /// Fetch attempts per page before the crawl is aborted
    #[arg(long, value_name = "N")]
    max_fetch_attempts: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Loads the configuration file (or defaults) and applies CLI overrides
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(save_path) = &self.save_path {
            config.output.save_path = save_path.clone();
        }
        if let Some(page_limit) = self.page_limit {
            config.crawler.page_limit = page_limit;
        }
        if self.merge_last_page {
            config.crawler.merge_last_page = true;
        }
        if let Some(attempts) = self.max_fetch_attempts {
            config.crawler.max_fetch_attempts = attempts;
        }

        validate(&config).context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    let hash = compute_config_hash(&config)?;
    tracing::info!("Configuration resolved (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("politifact_links=info,warn"),
            1 => EnvFilter::new("politifact_links=debug,info"),
            2 => EnvFilter::new("politifact_links=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== politifact-links Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Page limit: {}", config.crawler.page_limit);
    println!("  Workers: {}", config.crawler.effective_workers());
    println!(
        "  Politeness delays: {:?} ms",
        config.crawler.politeness_delays_ms
    );
    println!("  Fetch attempts: {}", config.crawler.max_fetch_attempts);
    println!("  Merge last page: {}", config.crawler.merge_last_page);

    println!("\nSite:");
    println!("  Origin: {}", config.site.origin);
    println!("  Listing path: {}", config.site.listing_path);
    println!("  Accepted language: {}", config.site.accepted_language);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput ({}):", config.output.save_path);
    println!("  {}", config.output.personalities_file);
    println!("  {}", config.output.articles_file);
    println!("  {}", config.output.config_record_file);

    println!("\nStart URLs ({}):", config.crawler.start_urls.len());
    for url in &config.crawler.start_urls {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} listings into {}",
        config.crawler.start_urls.len(),
        config.output.save_path
    );

    match run_crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
