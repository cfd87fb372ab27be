//! Link extraction from a parsed listing page
//!
//! For every listing item the first anchor is the personality and the
//! second the article. An article is kept only if its claim slug
//! classifies as the accepted language. The page's "next" control decides
//! whether the chain continues.

use crate::config::SiteConfig;
use crate::crawler::classifier::LanguageClassifier;
use crate::crawler::parser::{element_label, ListingSelectors};
use crate::state::{LinkPair, RoundOutcome};
use crate::url::{article_slug, next_page_url, page_number, slug_filter_text};
use crate::{ConfigError, CrawlError};
use scraper::{ElementRef, Html};

/// A "next page" control found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextControl {
    /// The raw relative href of the control
    pub href: String,

    /// Page number parsed from `?page=N`
    pub page_number: u32,
}

/// Extracts link pairs and pagination from listing pages
///
/// Holds the compiled selectors and a reference to the classifier, so one
/// extractor serves every seed of every round.
pub struct LinkExtractor<'a, C: LanguageClassifier> {
    site: &'a SiteConfig,
    classifier: &'a C,
    selectors: ListingSelectors,
}

impl<'a, C: LanguageClassifier> LinkExtractor<'a, C> {
    /// Creates an extractor for the given site
    ///
    /// # Returns
    ///
    /// * `Ok(LinkExtractor)` - Selectors compiled
    /// * `Err(ConfigError)` - A configured selector is invalid
    pub fn new(site: &'a SiteConfig, classifier: &'a C) -> Result<Self, ConfigError> {
        Ok(Self {
            site,
            classifier,
            selectors: ListingSelectors::from_site(site)?,
        })
    }

    /// Creates an extractor from selectors that were already compiled
    pub fn with_selectors(
        site: &'a SiteConfig,
        classifier: &'a C,
        selectors: ListingSelectors,
    ) -> Self {
        Self {
            site,
            classifier,
            selectors,
        }
    }

    /// Extracts one listing page
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed listing page
    /// * `page_limit` - Highest page number the chain may advance to
    ///
    /// # Errors
    ///
    /// * `CrawlError::MalformedListingItem` - an item lacks its two anchors or an href
    /// * `CrawlError::ShapeViolation` - an article stub does not split into 8 segments
    /// * `CrawlError::ClassificationFailure` - the classifier failed on an article
    pub fn extract(&self, document: &Html, page_limit: u32) -> Result<RoundOutcome, CrawlError> {
        let mut outcome = RoundOutcome::default();

        for item in document.select(&self.selectors.item) {
            let pair = self.item_pair(&item)?;
            if self.is_accepted(&pair.article)? {
                outcome.pairs.insert(pair);
            } else {
                outcome.rejected += 1;
            }
        }

        if let Some(next) = self.find_next_control(document) {
            outcome.next_page_number = Some(next.page_number);
            if next.page_number <= page_limit {
                outcome.has_next = true;
                outcome.next_url = Some(next_page_url(&self.site.listing_path, &next.href));
            }
        }

        Ok(outcome)
    }

    /// Reads the (personality, article) stubs of one listing item
    fn item_pair(&self, item: &ElementRef<'_>) -> Result<LinkPair, CrawlError> {
        let mut anchors = item.select(&self.selectors.anchor);
        let personality = anchor_href(anchors.next(), "personality")?;
        let article = anchor_href(anchors.next(), "article")?;
        Ok(LinkPair::new(personality, article))
    }

    /// Classifies the article's slug and compares it to the accepted language
    fn is_accepted(&self, article: &str) -> Result<bool, CrawlError> {
        let slug = article_slug(article)?;
        let text = slug_filter_text(slug);

        let language = self
            .classifier
            .classify(&text)
            .map_err(|source| CrawlError::ClassificationFailure {
                stub: article.to_string(),
                source,
            })?;
        let accepted = language == self.site.accepted_language;

        tracing::debug!(
            stub = slug,
            text = %text,
            language = %language,
            accepted,
            "Classified article slug"
        );

        Ok(accepted)
    }

    /// Finds the genuine "next page" control
    ///
    /// A control qualifies when its label equals the configured next label
    /// and its href carries `?page=N`. When several qualify, the last one in
    /// document order wins.
    pub fn find_next_control(&self, document: &Html) -> Option<NextControl> {
        document
            .select(&self.selectors.next_control)
            .filter_map(|control| {
                let href = control.value().attr("href")?;
                let number = page_number(href)?;
                if element_label(&control) != self.site.next_label {
                    return None;
                }
                Some(NextControl {
                    href: href.to_string(),
                    page_number: number,
                })
            })
            .last()
    }
}

fn anchor_href(anchor: Option<ElementRef<'_>>, role: &str) -> Result<String, CrawlError> {
    let anchor = anchor.ok_or_else(|| CrawlError::MalformedListingItem {
        reason: format!("missing {} anchor", role),
    })?;

    anchor
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(|| CrawlError::MalformedListingItem {
            reason: format!("{} anchor has no href", role),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::classifier::ClassifierError;
    use crate::crawler::parser::parse_html;
    use std::collections::HashMap;

    /// Classifies by exact filter text, "en" for anything unknown
    struct MapClassifier(HashMap<&'static str, &'static str>);

    impl LanguageClassifier for MapClassifier {
        fn classify(&self, text: &str) -> Result<String, ClassifierError> {
            Ok(self.0.get(text).copied().unwrap_or("en").to_string())
        }
    }

    struct FailingClassifier;

    impl LanguageClassifier for FailingClassifier {
        fn classify(&self, _text: &str) -> Result<String, ClassifierError> {
            Err(ClassifierError::Backend("model not loaded".to_string()))
        }
    }

    fn item(personality: &str, article: &str) -> String {
        format!(
            r#"<li class="o-listicle__item">
                <div class="m-statement__author"><a href="{}">Someone</a></div>
                <div class="m-statement__quote"><a href="{}">A claim</a></div>
            </li>"#,
            personality, article
        )
    }

    fn next_button(href: &str, label: &str) -> String {
        format!(
            r#"<a class="c-button c-button--hollow" href="{}">{}</a>"#,
            href, label
        )
    }

    fn page(items: &[String], controls: &[String]) -> Html {
        parse_html(&format!(
            r#"<html><body><ul class="o-listicle__list">{}</ul><nav>{}</nav></body></html>"#,
            items.concat(),
            controls.concat()
        ))
    }

    fn english_only() -> MapClassifier {
        MapClassifier(HashMap::from([("la economia esta creciendo", "es")]))
    }

    const ARTICLE_EN: &str = "/factchecks/2024/jan/15/joe-biden/the-economy-is-growing-fast/";
    const ARTICLE_ES: &str = "/factchecks/2024/jan/16/maria-lopez/la-economia-esta-creciendo-rapido/";

    #[test]
    fn test_scenario_one_english_one_spanish() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(
            &[
                item("/personalities/joe-biden/", ARTICLE_EN),
                item("/personalities/maria-lopez/", ARTICLE_ES),
            ],
            &[next_button("?page=2", "Next")],
        );

        let outcome = extractor.extract(&document, 50).unwrap();

        assert_eq!(outcome.pairs.len(), 1);
        assert!(outcome
            .pairs
            .contains(&LinkPair::new("/personalities/joe-biden/", ARTICLE_EN)));
        assert_eq!(outcome.rejected, 1);
        assert!(outcome.has_next);
        assert_eq!(outcome.next_page_number, Some(2));
        assert_eq!(
            outcome.next_url.as_deref(),
            Some("https://www.politifact.com/factchecks/list/?page=2")
        );
    }

    #[test]
    fn test_non_english_code_excluded() {
        let site = SiteConfig::default();
        let classifier = MapClassifier(HashMap::from([("the economy is growing", "fr")]));
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(&[item("/personalities/joe-biden/", ARTICLE_EN)], &[]);
        let outcome = extractor.extract(&document, 50).unwrap();

        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.rejected, 1);
    }

    #[test]
    fn test_empty_page() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let outcome = extractor.extract(&page(&[], &[]), 50).unwrap();

        assert!(outcome.pairs.is_empty());
        assert!(!outcome.has_next);
        assert_eq!(outcome.next_url, None);
        assert_eq!(outcome.next_page_number, None);
    }

    #[test]
    fn test_ceiling_ends_chain() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(
            &[item("/personalities/joe-biden/", ARTICLE_EN)],
            &[next_button("?page=2", "Next")],
        );
        let outcome = extractor.extract(&document, 1).unwrap();

        assert!(!outcome.has_next);
        assert_eq!(outcome.next_url, None);
        assert_eq!(outcome.next_page_number, Some(2));
        // the page's own pairs are still reported
        assert_eq!(outcome.pairs.len(), 1);
    }

    #[test]
    fn test_page_at_limit_is_allowed() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(&[], &[next_button("?page=5&ruling=false", "Next")]);
        let outcome = extractor.extract(&document, 5).unwrap();

        assert!(outcome.has_next);
        assert_eq!(
            outcome.next_url.as_deref(),
            Some("https://www.politifact.com/factchecks/list/?page=5&ruling=false")
        );
    }

    #[test]
    fn test_shape_violation_is_raised() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        for article in [
            "/factchecks/2024/jan/joe-biden/short-claim-x/",
            "/factchecks/2024/jan/15/joe-biden/long-claim-x/extra/",
        ] {
            let document = page(&[item("/personalities/joe-biden/", article)], &[]);
            let err = extractor.extract(&document, 50).unwrap_err();
            match err {
                CrawlError::ShapeViolation { stub, .. } => assert_eq!(stub, article),
                other => panic!("expected shape violation, got {other}"),
            }
        }
    }

    #[test]
    fn test_classifier_failure_names_stub() {
        let site = SiteConfig::default();
        let classifier = FailingClassifier;
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(&[item("/personalities/joe-biden/", ARTICLE_EN)], &[]);
        let err = extractor.extract(&document, 50).unwrap_err();

        match err {
            CrawlError::ClassificationFailure { stub, .. } => assert_eq!(stub, ARTICLE_EN),
            other => panic!("expected classification failure, got {other}"),
        }
    }

    #[test]
    fn test_item_with_single_anchor_is_malformed() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = parse_html(
            r#"<ul><li class="o-listicle__item"><a href="/personalities/x/">X</a></li></ul>"#,
        );
        let err = extractor.extract(&document, 50).unwrap_err();
        assert!(matches!(err, CrawlError::MalformedListingItem { .. }));
    }

    #[test]
    fn test_next_control_requires_label_and_page() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(
            &[],
            &[
                next_button("?page=1", "Previous"),
                next_button("?ruling=true", "Next"),
            ],
        );
        assert_eq!(extractor.find_next_control(&document), None);
    }

    #[test]
    fn test_last_qualifying_next_control_wins() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(
            &[],
            &[
                next_button("?page=3", "Next"),
                next_button("?page=1", "Previous"),
                next_button("?page=4", "Next"),
            ],
        );
        let next = extractor.find_next_control(&document).unwrap();
        assert_eq!(next.page_number, 4);
        assert_eq!(next.href, "?page=4");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let site = SiteConfig::default();
        let classifier = english_only();
        let extractor = LinkExtractor::new(&site, &classifier).unwrap();

        let document = page(
            &[item("/personalities/joe-biden/", ARTICLE_EN)],
            &[next_button("?page=2", "Next")],
        );
        let first = extractor.extract(&document, 50).unwrap();
        let second = extractor.extract(&document, 50).unwrap();
        assert_eq!(first, second);
    }
}
