//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - A randomized politeness delay before every request
//! - Bounded retry with exponential backoff for transient failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use rand::{rng, Rng};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Upper bound for the backoff between two fetch attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Fetches raw page content for a URL
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Returns the body of the page at `url`
    async fn fetch(&self, url: &str) -> Result<String, CrawlError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Optional whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use politifact_links::config::UserAgentConfig;
/// use politifact_links::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), None).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Picks one of the politeness delays uniformly at random
pub fn pick_delay(delays: &[Duration]) -> Duration {
    if delays.is_empty() {
        return Duration::ZERO;
    }
    delays[rng().random_range(0..delays.len())]
}

/// Backoff before retry number `attempt` (1-based), with up to 250ms jitter
///
/// The delay follows `min(base * 2^(attempt-1), 30s) + jitter`.
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let delay = base.saturating_mul(1 << exponent).min(MAX_RETRY_DELAY);
    let jitter_ms: u64 = rng().random_range(0..=250);
    delay + Duration::from_millis(jitter_ms)
}

/// reqwest-backed fetcher that sleeps a politeness delay before each request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    politeness_delays: Vec<Duration>,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler and user agent configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, CrawlError> {
        let client = build_http_client(
            user_agent,
            crawler.request_timeout_secs.map(Duration::from_secs),
        )?;

        Ok(Self {
            client,
            politeness_delays: crawler
                .politeness_delays_ms
                .iter()
                .copied()
                .map(Duration::from_millis)
                .collect(),
            max_attempts: crawler.max_fetch_attempts.max(1),
            retry_base_delay: Duration::from_millis(crawler.retry_base_delay_ms),
        })
    }

    /// One politeness delay followed by one GET
    async fn fetch_once(&self, url: &str) -> Result<String, CrawlError> {
        let delay = pick_delay(&self.politeness_delays);
        tracing::trace!(url, ?delay, "Politeness delay before request");
        sleep(delay).await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CrawlError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}

impl PageFetcher for HttpFetcher {
    /// Fetches a URL, retrying up to the configured number of attempts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Success | Return body |
    /// | Any failure, attempts left | Back off, then retry |
    /// | Any failure, no attempts left | Return the last error |
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!(url, attempt, bytes = body.len(), "Fetched page");
                    return Ok(body);
                }
                Err(e) if attempt >= self.max_attempts => {
                    tracing::error!(
                        url,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Fetch failed, no attempts left"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = retry_delay(self.retry_base_delay, attempt);
                    tracing::warn!(
                        url,
                        attempt,
                        max = self.max_attempts,
                        ?delay,
                        error = %e,
                        "Fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
