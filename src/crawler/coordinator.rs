//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which:
//! - Drains the frontier one pathname at a time
//! - Serves pathnames already in the store without touching the network
//! - Fetches, converts and stores everything else
//! - Releases the browser session however the loop ends

use crate::config::Config;
use crate::convert::MarkdownConverter;
use crate::crawler::browser::{Browser, HttpBrowser};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::SiteProfile;
use crate::crawler::scheduler::Scheduler;
use crate::state::{Frontier, PathState};
use crate::storage::{open_store, PageStore};
use crate::url::Pathname;
use crate::Result;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::{Duration, Instant};

/// Log a progress line every this many processed pathnames
const PROGRESS_INTERVAL: usize = 25;

/// Summary of a finished crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Processed pathnames in visit order
    pub visited: Vec<Pathname>,

    /// Pages fetched from the site this run
    pub fetched: usize,

    /// Pages served from the store
    pub cached: usize,

    /// Pathnames the site answered 404 for
    pub not_found: Vec<Pathname>,

    /// Pathnames dropped by the skip-list
    pub skipped: Vec<Pathname>,

    pub elapsed: Duration,
}

impl CrawlReport {
    fn from_frontier(frontier: &Frontier, fetched: usize, cached: usize, elapsed: Duration) -> Self {
        Self {
            visited: frontier.visited().to_vec(),
            fetched,
            cached,
            not_found: frontier.in_state(PathState::NotFound),
            skipped: frontier.in_state(PathState::Skipped),
            elapsed,
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns the browser session, the page store and the scheduler for the
/// duration of one run.
pub struct Coordinator<B: Browser, S: PageStore> {
    browser: B,
    store: S,
    scheduler: Scheduler,
    fetcher: PageFetcher,
    fetched: usize,
    cached: usize,
}

impl<B: Browser, S: PageStore> Coordinator<B, S> {
    pub fn new(browser: B, store: S, scheduler: Scheduler, fetcher: PageFetcher) -> Self {
        Self {
            browser,
            store,
            scheduler,
            fetcher,
            fetched: 0,
            cached: 0,
        }
    }

    /// Runs the crawl to completion and closes the browser session
    ///
    /// The session is closed whether the loop finished, failed or panicked.
    /// A loop error takes precedence over a close error; a panic is resumed
    /// once the session is closed.
    pub async fn run(mut self) -> Result<CrawlReport> {
        let outcome = AssertUnwindSafe(self.crawl()).catch_unwind().await;
        let closed = self.browser.close().await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(panic) => {
                if let Err(e) = closed {
                    tracing::warn!("Failed to close browser session: {}", e);
                }
                std::panic::resume_unwind(panic);
            }
        };

        match closed {
            Ok(()) => outcome,
            Err(e) if outcome.is_err() => {
                tracing::warn!("Failed to close browser session: {}", e);
                outcome
            }
            Err(e) => Err(e),
        }
    }

    async fn crawl(&mut self) -> Result<CrawlReport> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl with {} pending pathnames",
            self.scheduler.frontier().pending_len()
        );

        let mut processed = 0;
        while let Some(pathname) = self.scheduler.next_pathname() {
            self.process(&pathname).await?;
            processed += 1;

            if processed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} processed ({} fetched, {} cached), {} pending",
                    processed,
                    self.fetched,
                    self.cached,
                    self.scheduler.frontier().pending_len()
                );
            }
        }

        let report = CrawlReport::from_frontier(
            self.scheduler.frontier(),
            self.fetched,
            self.cached,
            start_time.elapsed(),
        );

        tracing::info!(
            "Crawl completed: {} visited ({} fetched, {} cached), {} not found in {:?}",
            report.visited.len(),
            report.fetched,
            report.cached,
            report.not_found.len(),
            report.elapsed
        );

        Ok(report)
    }

    /// Processes a single pathname
    async fn process(&mut self, pathname: &Pathname) -> Result<()> {
        if let Some(record) = self.store.read_optional(pathname)? {
            tracing::debug!("Using stored copy of {}", pathname);
            let frontier = self.scheduler.frontier_mut();
            frontier.mark_visited(pathname);
            frontier.expand(&record.meta);
            self.cached += 1;
            return Ok(());
        }

        self.scheduler.wait_for_slot().await;
        let result = self.fetcher.fetch(&mut self.browser, pathname).await;
        self.scheduler.record_fetch();

        match result? {
            FetchResult::Fetched(page) => {
                tracing::info!("Fetched {} ({} links)", pathname, page.meta.links.len());
                self.store.write(&page.meta, &page.markdown)?;

                let frontier = self.scheduler.frontier_mut();
                frontier.mark_visited(pathname);
                frontier.expand(&page.meta);
                self.fetched += 1;
            }
            FetchResult::NotFound => {
                tracing::warn!("{} not found, dropping it", pathname);
                self.scheduler.frontier_mut().mark_not_found(pathname);
            }
        }

        Ok(())
    }
}

/// Runs a complete crawl as described by the configuration
///
/// 1. Compile the site profile and converter
/// 2. Seed the frontier, applying the skip-list
/// 3. Open the store and a browser session
/// 4. Crawl until the frontier is empty
pub async fn run_crawl(config: &Config) -> Result<CrawlReport> {
    let profile = SiteProfile::new(&config.site)?;
    let converter = MarkdownConverter::new(profile.site_root().clone(), config.markdown.clone());
    tracing::debug!("Conversion rules: {}", converter.rule_names().join(", "));
    let fetcher = PageFetcher::new(profile, converter);

    let frontier = Frontier::new(config.site.seeds.clone(), config.site.skip.clone());
    let scheduler = Scheduler::new(frontier, config.crawler.delay());

    let store = open_store(Path::new(&config.store.root));
    let browser = HttpBrowser::launch(&config.crawler)?;

    Coordinator::new(browser, store, scheduler, fetcher).run().await
}
