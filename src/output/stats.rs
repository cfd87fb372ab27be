//! Crawl statistics
//!
//! Counters gathered by the coordinator while it runs, and a plain-text
//! report printed at the end of a crawl.

use crate::state::GlobalLinkSets;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the coordinator was created
    pub started_at: DateTime<Utc>,

    /// When the crawl reached `Done`
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of completed rounds
    pub rounds: u32,

    /// Listing pages fetched and extracted
    pub pages_fetched: u64,

    /// Pairs that passed the language filter, before deduplication
    pub pairs_accepted: u64,

    /// Listing items dropped by the language filter
    pub items_rejected: u64,

    /// Unique personality links in the final set
    pub personalities: u64,

    /// Unique article links in the final set
    pub articles: u64,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            rounds: 0,
            pages_fetched: 0,
            pairs_accepted: 0,
            items_rejected: 0,
            personalities: 0,
            articles: 0,
        }
    }

    /// Records the final link counts and the finish time
    pub fn finish(&mut self, links: &GlobalLinkSets) {
        self.personalities = links.personalities().len() as u64;
        self.articles = links.articles().len() as u64;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of classified listing items that were kept, as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        let classified = self.pairs_accepted + self.items_rejected;
        if classified == 0 {
            return 0.0;
        }
        (self.pairs_accepted as f64 / classified as f64) * 100.0
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {}s", duration);
    }

    println!("\nRounds: {}", stats.rounds);
    println!("Pages fetched: {}", stats.pages_fetched);
    println!(
        "Listing items: {} kept, {} rejected by language ({:.1}% kept)",
        stats.pairs_accepted,
        stats.items_rejected,
        stats.acceptance_rate()
    );

    println!("\nUnique personalities: {}", stats.personalities);
    println!("Unique articles: {}", stats.articles);
}
