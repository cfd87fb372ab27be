//! Configuration module for politifact-links
//!
//! This module handles loading, parsing, validating and recording TOML
//! configuration. Every key has a default, so a crawl can run without a
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use politifact_links::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will stop after page {}", config.crawler.page_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, persist_config};
pub use validation::validate;
