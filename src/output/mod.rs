//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the personality and article link files
//! - Recording and printing crawl statistics

pub mod stats;
mod writer;

pub use stats::{print_statistics, CrawlStatistics};
pub use writer::{CsvLinkWriter, LinkWriter, OutputError, OutputResult};
