use serde::{Deserialize, Serialize};

/// Main configuration structure for a link crawl
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Highest page number any seed chain may advance to
    pub page_limit: u32,

    /// Listing URLs every crawl starts from, one chain per URL
    pub start_urls: Vec<String>,

    /// Number of seeds processed concurrently within a round
    ///
    /// Defaults to the available parallelism of the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Politeness delays (milliseconds); one is picked at random before every request
    pub politeness_delays_ms: Vec<u64>,

    /// Total fetch attempts per page, 1 disables retrying
    pub max_fetch_attempts: u32,

    /// Initial backoff between fetch attempts (milliseconds), doubled per attempt
    pub retry_base_delay_ms: u64,

    /// Whole-request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Also merge links found on the final page of each chain
    pub merge_last_page: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_limit: 50,
            start_urls: default_start_urls(),
            workers: None,
            politeness_delays_ms: vec![3000, 5000, 7000],
            max_fetch_attempts: 1,
            retry_base_delay_ms: 1000,
            request_timeout_secs: None,
            merge_last_page: false,
        }
    }
}

impl CrawlerConfig {
    /// Returns the configured worker count, falling back to the host's parallelism
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// One start URL per ruling on the fact-check listing
fn default_start_urls() -> Vec<String> {
    [
        "true",
        "mostly-true",
        "half-true",
        "barely-true",
        "false",
        "pants-fire",
        "full-flop",
        "half-flip",
        "no-flip",
    ]
    .iter()
    .map(|ruling| format!("https://www.politifact.com/factchecks/list/?ruling={}", ruling))
    .collect()
}

/// Describes the markup and URL shape of the listing site
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Site origin prefixed to every stub at output time
    pub origin: String,

    /// Listing path that relative "next page" hrefs are appended to
    pub listing_path: String,

    /// CSS selector for one personality/article listing item
    pub listing_item_selector: String,

    /// CSS selector for pagination controls
    pub next_control_selector: String,

    /// Visible label of the genuine "next page" control
    pub next_label: String,

    /// Language code an article's slug must classify as to be kept
    pub accepted_language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.politifact.com".to_string(),
            listing_path: "https://www.politifact.com/factchecks/list/".to_string(),
            listing_item_selector: "li.o-listicle__item".to_string(),
            next_control_selector: "a.c-button.c-button--hollow".to_string(),
            next_label: "Next".to_string(),
            accepted_language: "en".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "politifact-links".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory all output files are written to (created if absent)
    pub save_path: String,

    /// File name for the personality links
    pub personalities_file: String,

    /// File name for the article links
    pub articles_file: String,

    /// File name the resolved configuration is recorded under
    pub config_record_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_path: "script_outputs/politifact-raw".to_string(),
            personalities_file: "politifact_personalities_links.csv".to_string(),
            articles_file: "politifact_article_links.csv".to_string(),
            config_record_file: "crawl_config.toml".to_string(),
        }
    }
}
