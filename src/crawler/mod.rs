//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with independent connect/total timeouts
//! - Raw href extraction from HTML
//! - Breadth-first crawl coordination with a one-time retry pass

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::extract_hrefs;
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};

use crate::config::Config;
use crate::state::StatsSnapshot;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It seeds the
/// frontier, drains it breadth-first, grants unresponsive URLs their single
/// retry pass, and persists the final statistics snapshot.
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(StatsSnapshot)` - The final statistics of the completed crawl
/// * `Err(CrawlError)` - Setup failed before the crawl could start
pub async fn crawl(config: Config) -> Result<StatsSnapshot, CrawlError> {
    run_crawl(config).await
}
