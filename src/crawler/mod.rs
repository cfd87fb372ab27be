//! Crawler module for listing page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with politeness delays and bounded retry
//! - HTML parsing and link extraction
//! - Language filtering of article slugs
//! - Round-based crawl coordination

mod classifier;
mod coordinator;
mod extractor;
mod fetcher;
mod parser;

pub use classifier::{ClassifierError, LanguageClassifier, WhatlangClassifier, UNDETERMINED};
pub use coordinator::{next_seed, Coordinator, HttpCoordinator};
pub use extractor::{LinkExtractor, NextControl};
pub use fetcher::{build_http_client, pick_delay, retry_delay, HttpFetcher, PageFetcher};
pub use parser::{parse_html, ListingSelectors};

use crate::config::{persist_config, Config};
use crate::output::{CrawlStatistics, CsvLinkWriter, LinkWriter};
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the save directory and record the resolved configuration
/// 2. Build the HTTP fetcher and language classifier
/// 3. Run rounds until every seed chain has ended
/// 4. Write the personality and article link files
///
/// No link file is written if the crawl fails.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed successfully
/// * `Err(CrawlError)` - Crawl failed
///
/// # Example
///
/// ```no_run
/// use politifact_links::config::Config;
/// use politifact_links::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_crawl(Config::default()).await?;
/// println!("{} articles", stats.articles);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    let record = persist_config(&config)?;
    tracing::info!("Saved run configuration to {}", record.display());

    let writer = CsvLinkWriter::from_config(&config);

    let mut coordinator = HttpCoordinator::from_config(config)?;
    coordinator.run().await?;
    let (links, stats) = coordinator.into_results();

    writer.write(&links)?;

    Ok(stats)
}
