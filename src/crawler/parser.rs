//! HTML parsing for listing pages
//!
//! This module turns a fetched listing page into a `scraper::Html` document
//! and compiles the CSS selectors the extractor needs:
//! - listing items (one personality + article each)
//! - anchors inside an item
//! - pagination controls

use crate::config::SiteConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Parses raw page content into a navigable document
///
/// html5ever recovers from malformed markup, so this never fails.
pub fn parse_html(html: &str) -> Html {
    Html::parse_document(html)
}

/// Compiled selectors for one site's listing markup
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// Matches one listing item
    pub item: Selector,

    /// Matches anchors with an href inside a listing item
    pub anchor: Selector,

    /// Matches pagination controls
    pub next_control: Selector,
}

impl ListingSelectors {
    /// Compiles the selectors described by the site configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ListingSelectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - A configured selector is not valid CSS
    pub fn from_site(site: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item: compile(&site.listing_item_selector)?,
            anchor: compile("a")?,
            next_control: compile(&site.next_control_selector)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// Returns the visible label of an element with surrounding whitespace removed
pub fn element_label(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
