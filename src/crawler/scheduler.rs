//! Scheduler for the crawl frontier and request pacing
//!
//! This module handles:
//! - Handing out pending pathnames in frontier order
//! - Enforcing a fixed minimum delay between fresh fetches
//!
//! Cache hits never touch the network, so they neither wait nor reset the
//! delay.

use crate::state::Frontier;
use crate::url::Pathname;
use std::time::Duration;
use tokio::time::Instant;

/// Owns the frontier and paces fresh fetches
#[derive(Debug)]
pub struct Scheduler {
    /// Traversal state for this run
    frontier: Frontier,

    /// Minimum time between the starts of two fresh fetches
    delay: Duration,

    /// When the last fresh fetch was recorded
    last_fetch: Option<Instant>,
}

impl Scheduler {
    pub fn new(frontier: Frontier, delay: Duration) -> Self {
        Self {
            frontier,
            delay,
            last_fetch: None,
        }
    }

    /// Next pathname to process, or `None` once the frontier is drained
    pub fn next_pathname(&mut self) -> Option<Pathname> {
        self.frontier.pop()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    /// Time left before the next fresh fetch may start
    pub fn time_until_ready(&self) -> Duration {
        match self.last_fetch {
            Some(last) => self.delay.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Waits until the next fresh fetch may start
    pub async fn wait_for_slot(&self) {
        let wait = self.time_until_ready();
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next fetch", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a fresh fetch just completed
    pub fn record_fetch(&mut self) {
        self.last_fetch = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pathname {
        Pathname::parse(s).unwrap()
    }

    #[test]
    fn test_first_fetch_is_immediate() {
        let scheduler = Scheduler::new(Frontier::default(), Duration::from_millis(500));
        assert_eq!(scheduler.time_until_ready(), Duration::ZERO);
    }

    #[test]
    fn test_delay_after_fetch() {
        let mut scheduler = Scheduler::new(Frontier::default(), Duration::from_secs(60));
        scheduler.record_fetch();

        let wait = scheduler.time_until_ready();
        assert!(wait > Duration::from_secs(59));
        assert!(wait <= Duration::from_secs(60));
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut scheduler = Scheduler::new(Frontier::default(), Duration::ZERO);
        scheduler.record_fetch();
        assert_eq!(scheduler.time_until_ready(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_wait_for_slot_sleeps_out_the_delay() {
        let mut scheduler = Scheduler::new(Frontier::default(), Duration::from_millis(50));
        scheduler.record_fetch();

        let start = std::time::Instant::now();
        scheduler.wait_for_slot().await;
        assert!(start.elapsed() >= Duration::from_millis(45));
        assert_eq!(scheduler.time_until_ready(), Duration::ZERO);
    }

    #[test]
    fn test_next_pathname_follows_frontier() {
        let frontier = Frontier::new(vec![p("/a/"), p("/b/")], vec![]);
        let mut scheduler = Scheduler::new(frontier, Duration::ZERO);

        assert_eq!(scheduler.next_pathname(), Some(p("/a/")));
        assert_eq!(scheduler.next_pathname(), Some(p("/b/")));
        assert_eq!(scheduler.next_pathname(), None);
    }
}
