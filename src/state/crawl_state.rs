/// Crawl state definitions for the round-based coordinator
///
/// The coordinator is either still running rounds over active seeds or done.
use crate::url::page_number;
use std::fmt;

/// Represents the lifecycle state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// At least one seed still has a page to fetch
    Running,

    /// No seed has a further page; the link sets are final
    Done,
}

impl CrawlState {
    /// Returns the state implied by the number of seeds left after a merge
    pub fn after_merge(active_seeds: usize) -> Self {
        if active_seeds == 0 {
            Self::Done
        } else {
            Self::Running
        }
    }

    /// Returns true if this is the terminal state
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// An active pagination cursor: the next listing page of one chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Seed {
    /// The listing page to fetch next
    pub url: String,

    /// Page number of `url`; 1 when the URL carries no `?page=N`
    pub page_number: u32,

    /// Highest page number this chain may advance to
    pub page_limit: u32,
}

impl Seed {
    /// Creates a seed for a start URL
    pub fn new(url: impl Into<String>, page_limit: u32) -> Self {
        let url = url.into();
        let page_number = page_number(&url).unwrap_or(1);
        Self {
            url,
            page_number,
            page_limit,
        }
    }

    /// Creates the seed that continues this chain at `next_url`
    pub fn advance(&self, next_url: String, next_page_number: u32) -> Self {
        Self {
            url: next_url,
            page_number: next_page_number,
            page_limit: self.page_limit,
        }
    }
}
