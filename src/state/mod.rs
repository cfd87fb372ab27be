//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Running/Done state of the round-based coordinator
//! - `Seed`: an active pagination cursor
//! - `RoundOutcome`: what one listing page yielded
//! - `GlobalLinkSets`: the deduplicated personality and article stubs

mod crawl_state;
mod link_sets;

// Re-export main types
pub use crawl_state::{CrawlState, Seed};
pub use link_sets::{GlobalLinkSets, LinkPair, RoundOutcome};
