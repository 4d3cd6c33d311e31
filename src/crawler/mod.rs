//! Crawler module for fan-out link crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with scheme fallback and bounded retries
//! - Link extraction with an asset-extension denylist
//! - Workers that report links and crawl what they are authorized to
//! - The coordinator that owns the visited registry and arbitrates reports

mod coordinator;
mod extractor;
mod fetcher;
mod messages;
mod static_pages;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::extract_links;
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageSource};
pub use messages::{Authorization, ControllerMessage};
pub use static_pages::StaticPages;
pub use worker::Worker;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::FanoutError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP clients and open the output log
/// 2. Fetch the seed and spawn the worker pool
/// 3. Arbitrate discovered links until every worker has exited
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl ran to completion
/// * `Err(FanoutError)` - Setup failed or the seed yielded nothing
pub async fn crawl(config: Config) -> Result<CrawlSummary, FanoutError> {
    run_crawl(config).await
}
