use crate::state::PathState;
use crate::storage::PageMeta;
use crate::url::Pathname;
use std::collections::{HashMap, HashSet, VecDeque};

/// Traversal state for a single crawl run
///
/// The frontier owns the FIFO of pending pathnames, the per-pathname state
/// map, and the fixed skip-list. Pending entries come out in insertion order,
/// so identical seeds and identical discovered-link order give identical visit
/// order.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// Pathnames waiting to be processed, oldest first
    pending: VecDeque<Pathname>,

    /// State of every pathname seen during this run
    states: HashMap<Pathname, PathState>,

    /// Pathnames that are never processed
    skip: HashSet<Pathname>,

    /// Visited pathnames in visit order
    visited: Vec<Pathname>,
}

impl Frontier {
    /// Creates a frontier from seed pathnames and a skip-list
    ///
    /// Seeds are enqueued in order; seeds on the skip-list are dropped.
    pub fn new(
        seeds: impl IntoIterator<Item = Pathname>,
        skip: impl IntoIterator<Item = Pathname>,
    ) -> Self {
        let mut frontier = Self {
            skip: skip.into_iter().collect(),
            ..Self::default()
        };

        for seed in seeds {
            frontier.enqueue(&seed);
        }

        frontier
    }

    /// Appends a pathname to the pending queue
    ///
    /// Returns false if the pathname was already seen this run or is on the
    /// skip-list.
    pub fn enqueue(&mut self, pathname: &Pathname) -> bool {
        if self.states.contains_key(pathname) {
            return false;
        }

        if self.skip.contains(pathname) {
            tracing::debug!("Skipping {} (skip-list)", pathname);
            self.states.insert(pathname.clone(), PathState::Skipped);
            return false;
        }

        self.states.insert(pathname.clone(), PathState::Pending);
        self.pending.push_back(pathname.clone());
        true
    }

    /// Enqueues every pathname referenced by a page, in `next`, `prev`, `links` order
    ///
    /// Returns the number of newly pending pathnames.
    pub fn expand(&mut self, meta: &PageMeta) -> usize {
        meta.referenced()
            .filter(|pathname| self.enqueue(pathname))
            .count()
    }

    /// Removes and returns the oldest pending pathname
    ///
    /// The pathname stays in the `Pending` state until it is marked visited
    /// or not found.
    pub fn pop(&mut self) -> Option<Pathname> {
        self.pending.pop_front()
    }

    /// Marks a pathname as processed
    pub fn mark_visited(&mut self, pathname: &Pathname) {
        if self.transition(pathname, PathState::Visited) {
            self.visited.push(pathname.clone());
        }
    }

    /// Marks a pathname as permanently dropped for this run
    pub fn mark_not_found(&mut self, pathname: &Pathname) {
        self.transition(pathname, PathState::NotFound);
    }

    fn transition(&mut self, pathname: &Pathname, next: PathState) -> bool {
        match self.states.get_mut(pathname) {
            Some(state) if state.can_transition_to(next) => {
                *state = next;
                true
            }
            Some(state) => {
                tracing::warn!("Ignoring transition {} -> {} for {}", state, next, pathname);
                false
            }
            None => {
                tracing::warn!("Ignoring transition to {} for unseen {}", next, pathname);
                false
            }
        }
    }

    /// Returns the state of a pathname, or `None` if it was never seen
    pub fn state(&self, pathname: &Pathname) -> Option<PathState> {
        self.states.get(pathname).copied()
    }

    /// Returns the number of pending pathnames
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether nothing is left to process
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Visited pathnames in visit order
    pub fn visited(&self) -> &[Pathname] {
        &self.visited
    }

    /// Sorted pathnames currently in the given state
    pub fn in_state(&self, state: PathState) -> Vec<Pathname> {
        let mut pathnames: Vec<Pathname> = self
            .states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(p, _)| p.clone())
            .collect();
        pathnames.sort();
        pathnames
    }
}
