use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_limit must be >= 1, got {}",
            config.page_limit
        )));
    }

    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start_urls must contain at least one listing URL".to_string(),
        ));
    }

    for start_url in &config.start_urls {
        validate_http_url("start URL", start_url)?;
    }

    if config.workers == Some(0) {
        return Err(ConfigError::Validation("workers must be >= 1".to_string()));
    }

    if config.politeness_delays_ms.is_empty() {
        return Err(ConfigError::Validation(
            "politeness_delays_ms must contain at least one delay".to_string(),
        ));
    }

    if config.max_fetch_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_fetch_attempts must be >= 1, got {}",
            config.max_fetch_attempts
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("origin", &config.origin)?;
    validate_http_url("listing path", &config.listing_path)?;
    validate_selector(&config.listing_item_selector)?;
    validate_selector(&config.next_control_selector)?;

    if config.next_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "next_label cannot be empty".to_string(),
        ));
    }

    if config.accepted_language.is_empty() {
        return Err(ConfigError::Validation(
            "accepted_language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("save_path", &config.save_path),
        ("personalities_file", &config.personalities_file),
        ("articles_file", &config.articles_file),
        ("config_record_file", &config.config_record_file),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.personalities_file == config.articles_file {
        return Err(ConfigError::Validation(format!(
            "personalities_file and articles_file must differ, both are '{}'",
            config.articles_file
        )));
    }

    Ok(())
}

/// Validates that a value is an absolute http(s) URL
fn validate_http_url(what: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            what, value
        )));
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}
