//! URL and stub helpers
//!
//! Listing pages link to personalities, articles and further pages with
//! relative hrefs ("stubs"). This module holds the small amount of string
//! handling needed to turn stubs into absolute URLs, read the page number
//! off a pagination href, and derive the text used for language filtering
//! from an article stub.

use crate::CrawlError;

/// Number of `/`-separated segments every article stub must split into
///
/// Article stubs look like `/factchecks/2024/jan/15/joe-biden/some-claim-slug/`,
/// which splits into `["", "factchecks", "2024", "jan", "15", "joe-biden",
/// "some-claim-slug", ""]`.
pub const ARTICLE_STUB_SEGMENTS: usize = 8;

/// Index of the claim slug within a split article stub
pub const ARTICLE_SLUG_INDEX: usize = 6;

const PAGE_QUERY: &str = "?page=";

/// Prefixes a stub with the site origin
///
/// # Example
///
/// ```
/// use politifact_links::url::absolute_url;
///
/// assert_eq!(
///     absolute_url("https://www.politifact.com", "/personalities/joe-biden/"),
///     "https://www.politifact.com/personalities/joe-biden/"
/// );
/// ```
pub fn absolute_url(origin: &str, stub: &str) -> String {
    format!("{}{}", origin, stub)
}

/// Builds the absolute URL of the next listing page from a pagination href
///
/// The href is appended verbatim to the listing path, so `?page=2&ruling=true`
/// becomes `<listing_path>?page=2&ruling=true`.
pub fn next_page_url(listing_path: &str, href: &str) -> String {
    format!("{}{}", listing_path, href)
}

/// Extracts `N` from the first `?page=N` in an href or URL
///
/// Returns `None` if there is no `?page=` marker or it is not followed by
/// at least one digit.
pub fn page_number(href: &str) -> Option<u32> {
    let start = href.find(PAGE_QUERY)? + PAGE_QUERY.len();
    let digits: &str = {
        let rest = &href[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Returns the claim slug of an article stub
///
/// # Errors
///
/// `CrawlError::ShapeViolation` if the stub does not split into exactly
/// [`ARTICLE_STUB_SEGMENTS`] segments.
pub fn article_slug(stub: &str) -> Result<&str, CrawlError> {
    let segments: Vec<&str> = stub.split('/').collect();
    if segments.len() != ARTICLE_STUB_SEGMENTS {
        return Err(CrawlError::ShapeViolation {
            stub: stub.to_string(),
            segments: segments.len(),
        });
    }
    Ok(segments[ARTICLE_SLUG_INDEX])
}

/// Turns a claim slug into the text handed to the language classifier
///
/// The trailing hyphen-delimited word (usually a disambiguating token) is
/// dropped and the remaining words are joined with spaces.
///
/// # Example
///
/// ```
/// use politifact_links::url::slug_filter_text;
///
/// assert_eq!(
///     slug_filter_text("biden-says-inflation-is-falling-xyz"),
///     "biden says inflation is falling"
/// );
/// ```
pub fn slug_filter_text(slug: &str) -> String {
    let words: Vec<&str> = slug.split('-').collect();
    words[..words.len() - 1].join(" ")
}
