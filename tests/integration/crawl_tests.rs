//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and run full crawls
//! end-to-end: HTTP fetch, parsing, extraction, merging and file output.

use politifact_links::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use politifact_links::crawler::{
    run_crawl, ClassifierError, Coordinator, HttpFetcher, LanguageClassifier,
};
use politifact_links::output::{CsvLinkWriter, LinkWriter};
use politifact_links::{CrawlError, CrawlState};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = "/factchecks/list/";

/// Treats slugs starting with "la " as Spanish, everything else as English
struct PrefixClassifier;

impl LanguageClassifier for PrefixClassifier {
    fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        if text.starts_with("la ") {
            Ok("es".to_string())
        } else {
            Ok("en".to_string())
        }
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, save_path: &str, page_limit: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            page_limit,
            start_urls: vec![format!("{}{}?ruling=true", base_url, LISTING)],
            workers: Some(2),
            politeness_delays_ms: vec![0, 1],
            max_fetch_attempts: 1,
            retry_base_delay_ms: 0,
            request_timeout_secs: Some(5),
            merge_last_page: false,
        },
        site: SiteConfig {
            origin: base_url.to_string(),
            listing_path: format!("{}{}", base_url, LISTING),
            ..SiteConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig {
            save_path: save_path.to_string(),
            ..OutputConfig::default()
        },
    }
}

fn listing_page(items: &[(&str, &str)], next_page: Option<u32>) -> String {
    let items: String = items
        .iter()
        .map(|(personality, article)| {
            format!(
                r#"<li class="o-listicle__item">
                    <div class="m-statement__meta"><a href="{}">Speaker</a></div>
                    <div class="m-statement__quote"><a href="{}">Statement</a></div>
                </li>"#,
                personality, article
            )
        })
        .collect();
    let pagination = next_page
        .map(|n| {
            format!(
                r#"<a class="c-button c-button--hollow" href="?page={}&amp;ruling=true">Next</a>"#,
                n
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Fact-checks</title></head><body>
        <ul class="o-listicle__list">{}</ul>
        <nav class="m-pagination">
            <a class="c-button c-button--hollow" href="?page=1&amp;ruling=true">Previous</a>
            {}
        </nav>
        </body></html>"#,
        items, pagination
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts a two-page listing: page 1 links to page 2, page 2 links to page 3
async fn mount_two_pages(server: &MockServer, page_one: String, page_two: String) {
    Mock::given(method("GET"))
        .and(path(LISTING))
        .and(query_param("page", "2"))
        .respond_with(html(page_two))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING))
        .and(query_param("ruling", "true"))
        .respond_with(html(page_one))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_two_pages(
        &mock_server,
        listing_page(
            &[
                (
                    "/personalities/joe-biden/",
                    "/factchecks/2024/jan/15/joe-biden/the-economy-is-growing-fast-x/",
                ),
                (
                    "/personalities/maria-lopez/",
                    "/factchecks/2024/jan/15/maria-lopez/la-economia-esta-creciendo-x/",
                ),
            ],
            Some(2),
        ),
        listing_page(
            &[(
                "/personalities/donald-trump/",
                "/factchecks/2024/jan/14/donald-trump/crime-is-up-everywhere-x/",
            )],
            Some(3),
        ),
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let save_path = dir.path().join("politifact-raw");
    let config = create_test_config(&base_url, &save_path.display().to_string(), 2);

    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)
        .expect("Failed to build fetcher");
    let writer = CsvLinkWriter::from_config(&config);
    let mut coordinator =
        Coordinator::new(config, fetcher, PrefixClassifier).expect("Failed to create coordinator");

    coordinator.run().await.expect("Crawl failed");
    assert_eq!(coordinator.state(), CrawlState::Done);
    assert_eq!(coordinator.statistics().rounds, 2);
    assert_eq!(coordinator.statistics().pages_fetched, 2);

    let (links, _) = coordinator.into_results();
    writer.write(&links).expect("Failed to write links");

    // page 1 had a next page within the limit: only its English pair is kept
    let personalities =
        std::fs::read_to_string(save_path.join("politifact_personalities_links.csv")).unwrap();
    assert_eq!(
        personalities,
        format!("{}/personalities/joe-biden/\n", base_url)
    );

    // page 2 pointed at page 3, past the limit, so it ended the chain unmerged
    let articles =
        std::fs::read_to_string(save_path.join("politifact_article_links.csv")).unwrap();
    assert_eq!(
        articles,
        format!(
            "{}/factchecks/2024/jan/15/joe-biden/the-economy-is-growing-fast-x/\n",
            base_url
        )
    );
}

#[tokio::test]
async fn test_page_limit_one_stops_after_first_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(LISTING))
        .and(query_param("page", "2"))
        .respond_with(html(listing_page(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING))
        .respond_with(html(listing_page(
            &[(
                "/personalities/joe-biden/",
                "/factchecks/2024/jan/15/joe-biden/the-economy-is-growing-fast-x/",
            )],
            Some(2),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir.path().display().to_string(), 1);
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();
    let mut coordinator = Coordinator::new(config, fetcher, PrefixClassifier).unwrap();

    coordinator.run().await.expect("Crawl failed");

    assert_eq!(coordinator.statistics().rounds, 1);
    assert!(coordinator.links().is_empty());
}

#[tokio::test]
async fn test_shape_violation_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(LISTING))
        .respond_with(html(listing_page(
            &[("/personalities/joe-biden/", "/factchecks/2024/jan/joe-biden/claim-x/")],
            Some(2),
        )))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir.path().display().to_string(), 50);
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();
    let mut coordinator = Coordinator::new(config, fetcher, PrefixClassifier).unwrap();

    let err = coordinator.run().await.unwrap_err();
    match err {
        CrawlError::ShapeViolation { stub, segments } => {
            assert_eq!(stub, "/factchecks/2024/jan/joe-biden/claim-x/");
            assert_eq!(segments, 7);
        }
        other => panic!("expected shape violation, got {}", other),
    }
}

#[tokio::test]
async fn test_server_error_aborts_crawl_without_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let save_path = dir.path().join("out");
    let config = create_test_config(&base_url, &save_path.display().to_string(), 50);

    let err = run_crawl(config).await.unwrap_err();
    assert!(matches!(err, CrawlError::HttpStatus { status: 500, .. }));

    // the run configuration is recorded, the link files are not
    assert!(save_path.join("crawl_config.toml").exists());
    assert!(!save_path.join("politifact_personalities_links.csv").exists());
    assert!(!save_path.join("politifact_article_links.csv").exists());
}

#[tokio::test]
async fn test_run_crawl_writes_files() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_two_pages(
        &mock_server,
        listing_page(
            &[(
                "/personalities/joe-biden/",
                "/factchecks/2024/jan/15/joe-biden/the-president-said-that-the-unemployment-rate-is-now-the-lowest-it-has-been-in-more-than-fifty-years-x/",
            )],
            Some(2),
        ),
        listing_page(&[], None),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let save_path = dir.path().join("politifact-raw");
    let config = create_test_config(&base_url, &save_path.display().to_string(), 50);

    let stats = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(stats.rounds, 2);
    assert_eq!(stats.personalities, 1);
    assert_eq!(stats.articles, 1);
    assert!(save_path.join("crawl_config.toml").exists());

    let personalities =
        std::fs::read_to_string(save_path.join("politifact_personalities_links.csv")).unwrap();
    assert_eq!(
        personalities,
        format!("{}/personalities/joe-biden/\n", base_url)
    );
}
