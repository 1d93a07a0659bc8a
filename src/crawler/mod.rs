//! Crawler module for mirroring the documentation site
//!
//! This module contains the core crawling logic, including:
//! - The browser session seam and its HTTP implementation
//! - Content region, link and navigation extraction
//! - Request pacing
//! - Overall crawl coordination

mod browser;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use browser::{build_http_client, Browser, HttpBrowser, LoadedPage};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{FetchResult, FetchedPage, PageFetcher};
pub use parser::{extract_page, label_selector, ExtractedPage, SiteProfile};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for mirroring. It will:
/// 1. Seed the frontier from the configured seeds
/// 2. Serve already stored pages from the store
/// 3. Fetch, convert and store every other reachable page
/// 4. Close the browser session
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The frontier was drained
/// * `Err(MirrorError)` - A fatal error stopped the crawl
pub async fn crawl(config: &Config) -> Result<CrawlReport> {
    run_crawl(config).await
}
