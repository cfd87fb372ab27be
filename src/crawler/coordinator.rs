//! Crawler coordinator - round-based crawl orchestration
//!
//! Every round fetches, parses and extracts all active seeds concurrently,
//! waits for all of them, then merges the outcomes single-threaded:
//! - seeds with a next page carry their links into the global sets and
//!   continue with the next page
//! - seeds without one end their chain
//!
//! The crawl is done when no seed is left. Any failure aborts it.

use crate::config::Config;
use crate::crawler::classifier::{LanguageClassifier, WhatlangClassifier};
use crate::crawler::extractor::LinkExtractor;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::{parse_html, ListingSelectors};
use crate::output::CrawlStatistics;
use crate::state::{CrawlState, GlobalLinkSets, RoundOutcome, Seed};
use crate::CrawlError;
use futures::stream::{self, StreamExt, TryStreamExt};

/// Coordinator backed by the HTTP fetcher and the whatlang classifier
pub type HttpCoordinator = Coordinator<HttpFetcher, WhatlangClassifier>;

/// Main crawler coordinator structure
pub struct Coordinator<F, C> {
    config: Config,
    fetcher: F,
    classifier: C,
    selectors: ListingSelectors,
    seeds: Vec<Seed>,
    links: GlobalLinkSets,
    state: CrawlState,
    stats: CrawlStatistics,
}

impl HttpCoordinator {
    /// Creates a coordinator that fetches over HTTP and classifies with whatlang
    pub fn from_config(config: Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
        Self::new(config, fetcher, WhatlangClassifier::new())
    }
}

impl<F, C> Coordinator<F, C>
where
    F: PageFetcher,
    C: LanguageClassifier,
{
    /// Creates a new coordinator instance
    ///
    /// The active seeds are the configured start URLs, all sharing the
    /// configured page limit.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Page fetcher used for every seed
    /// * `classifier` - Language classifier shared by every extraction
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The configured selectors do not compile
    pub fn new(config: Config, fetcher: F, classifier: C) -> Result<Self, CrawlError> {
        let selectors = ListingSelectors::from_site(&config.site)?;

        let page_limit = config.crawler.page_limit;
        let seeds = config
            .crawler
            .start_urls
            .iter()
            .map(|url| Seed::new(url.as_str(), page_limit))
            .collect::<Vec<_>>();
        let state = CrawlState::after_merge(seeds.len());

        Ok(Self {
            config,
            fetcher,
            classifier,
            selectors,
            seeds,
            links: GlobalLinkSets::new(),
            state,
            stats: CrawlStatistics::new(),
        })
    }

    /// Runs rounds until no seed is left
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The crawl reached `Done`
    /// * `Err(CrawlError)` - A seed failed; the crawl was aborted
    pub async fn run(&mut self) -> Result<(), CrawlError> {
        tracing::info!(
            "Starting crawl with {} seeds, page limit {}, {} workers",
            self.seeds.len(),
            self.config.crawler.page_limit,
            self.config.crawler.effective_workers()
        );

        while !self.state.is_done() {
            self.run_round().await?;
        }

        self.stats.finish(&self.links);
        tracing::info!(
            "Finished mining links. Page limit is {} for all seeds ({} rounds, {} personalities, {} articles)",
            self.config.crawler.page_limit,
            self.stats.rounds,
            self.links.personalities().len(),
            self.links.articles().len()
        );

        Ok(())
    }

    /// Runs one round: concurrent fetch/parse/extract over all seeds, then merge
    ///
    /// # Returns
    ///
    /// The state after the merge.
    pub async fn run_round(&mut self) -> Result<CrawlState, CrawlError> {
        let seeds = std::mem::take(&mut self.seeds);
        let workers = self.config.crawler.effective_workers();

        let outcomes = {
            let this = &*self;
            stream::iter(seeds.iter())
                .map(|seed| async move {
                    this.process_seed(seed)
                        .await
                        .map(|outcome| (seed, outcome))
                })
                .buffer_unordered(workers)
                .try_collect::<Vec<_>>()
                .await?
        };

        self.stats.rounds += 1;
        self.stats.pages_fetched += outcomes.len() as u64;

        let (next_seeds, progress_page) = self.merge(outcomes);
        self.seeds = next_seeds;
        self.state = CrawlState::after_merge(self.seeds.len());

        if self.state.is_done() {
            tracing::info!("No seed has a further page, crawl complete");
        } else {
            tracing::info!(
                "New URLs found. Continuing the process. Page: {} / {} ({} active seeds)",
                progress_page.unwrap_or_default(),
                self.config.crawler.page_limit,
                self.seeds.len()
            );
        }

        Ok(self.state)
    }

    /// Fetches, parses and extracts one seed's current page
    async fn process_seed(&self, seed: &Seed) -> Result<RoundOutcome, CrawlError> {
        tracing::debug!("Processing URL: {}", seed.url);

        let body = self.fetcher.fetch(&seed.url).await?;

        // the parsed document is not Send; keep it out of any await
        let extractor = LinkExtractor::with_selectors(
            &self.config.site,
            &self.classifier,
            self.selectors.clone(),
        );
        let document = parse_html(&body);
        let outcome = extractor.extract(&document, seed.page_limit).map_err(|e| {
            tracing::error!("Extraction failed for {}: {}", seed.url, e);
            e
        })?;

        tracing::debug!(
            url = %seed.url,
            accepted = outcome.pairs.len(),
            rejected = outcome.rejected,
            has_next = outcome.has_next,
            "Extracted listing page"
        );

        Ok(outcome)
    }

    /// Merges one round's outcomes into the global sets
    ///
    /// Returns the next round's seeds and the highest next-page number seen
    /// (for progress reporting).
    fn merge(&mut self, outcomes: Vec<(&Seed, RoundOutcome)>) -> (Vec<Seed>, Option<u32>) {
        let merge_last_page = self.config.crawler.merge_last_page;
        let mut next_seeds = Vec::new();
        let mut progress_page = None;

        for (seed, outcome) in outcomes {
            self.stats.pairs_accepted += outcome.pairs.len() as u64;
            self.stats.items_rejected += outcome.rejected as u64;

            if outcome.has_next || merge_last_page {
                self.links.merge_pairs(&outcome.pairs);
            }

            match next_seed(seed, &outcome) {
                Some(next) => {
                    progress_page = progress_page.max(Some(next.page_number));
                    next_seeds.push(next);
                }
                None => tracing::debug!("Chain ended at {}", seed.url),
            }
        }

        (next_seeds, progress_page)
    }

    /// Current lifecycle state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Seeds that the next round will process
    pub fn active_seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// Links accumulated so far
    pub fn links(&self) -> &GlobalLinkSets {
        &self.links
    }

    /// Statistics gathered so far
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Consumes the coordinator, returning the final link sets and statistics
    pub fn into_results(self) -> (GlobalLinkSets, CrawlStatistics) {
        (self.links, self.stats)
    }
}

/// Decides whether an outcome continues its seed's chain
///
/// The chain continues only if the page has a next page within the limit
/// and that page number is past the seed's current one; a non-advancing
/// next page would otherwise loop forever.
pub fn next_seed(seed: &Seed, outcome: &RoundOutcome) -> Option<Seed> {
    if !outcome.has_next {
        return None;
    }

    let next_url = outcome.next_url.clone()?;
    let next_page = outcome.next_page_number?;

    if next_page <= seed.page_number {
        tracing::warn!(
            "Pagination did not advance at {} (page {} -> {}), ending chain",
            seed.url,
            seed.page_number,
            next_page
        );
        return None;
    }

    Some(seed.advance(next_url, next_page))
}
