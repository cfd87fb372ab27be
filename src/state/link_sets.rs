use std::collections::{BTreeSet, HashSet};

/// A personality stub and the article stub listed next to it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkPair {
    pub personality: String,
    pub article: String,
}

impl LinkPair {
    pub fn new(personality: impl Into<String>, article: impl Into<String>) -> Self {
        Self {
            personality: personality.into(),
            article: article.into(),
        }
    }
}

/// Result of extracting one listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundOutcome {
    /// Absolute URL of the next listing page, set only when `has_next`
    pub next_url: Option<String>,

    /// True iff a "next" control was found and its page is within the limit
    pub has_next: bool,

    /// Pairs whose article passed the language filter
    pub pairs: HashSet<LinkPair>,

    /// Page number the "next" control pointed at, even when over the limit
    pub next_page_number: Option<u32>,

    /// Listing items dropped by the language filter
    pub rejected: usize,
}

/// Deduplicated personality and article stubs accumulated over a crawl
///
/// Both sets only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalLinkSets {
    personalities: HashSet<String>,
    articles: HashSet<String>,
}

impl GlobalLinkSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions a page's pairs into the sets
    ///
    /// Returns the number of stubs that were not present before.
    pub fn merge_pairs<'a, I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = &'a LinkPair>,
    {
        let mut added = 0;
        for pair in pairs {
            if self.personalities.insert(pair.personality.clone()) {
                added += 1;
            }
            if self.articles.insert(pair.article.clone()) {
                added += 1;
            }
        }
        added
    }

    pub fn personalities(&self) -> &HashSet<String> {
        &self.personalities
    }

    pub fn articles(&self) -> &HashSet<String> {
        &self.articles
    }

    /// Personality stubs in lexical order
    pub fn sorted_personalities(&self) -> BTreeSet<&str> {
        self.personalities.iter().map(String::as_str).collect()
    }

    /// Article stubs in lexical order
    pub fn sorted_articles(&self) -> BTreeSet<&str> {
        self.articles.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.personalities.is_empty() && self.articles.is_empty()
    }
}
