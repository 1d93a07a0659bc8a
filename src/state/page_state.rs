/// Pathname state definitions for tracking crawl progress
///
/// A pathname that has never been seen has no state at all. Once discovered it
/// moves through `Pending` into exactly one terminal state.
use std::fmt;

/// Represents the current state of a pathname during one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathState {
    // ===== Active States =====
    /// Pathname is queued and waiting to be processed
    Pending,

    // ===== Terminal States =====
    /// Pathname was processed, either from the store or by a fresh fetch
    Visited,

    /// Pathname is on the skip-list and is never processed
    Skipped,

    /// The site answered 404; the pathname is dropped for this run
    NotFound,
}

impl PathState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns whether moving from this state to `next` is allowed
    ///
    /// Only `Pending` may move, and only into a terminal state.
    pub fn can_transition_to(&self, next: PathState) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visited => "visited",
            Self::Skipped => "skipped",
            Self::NotFound => "not_found",
        }
    }

    /// Returns all possible states
    pub fn all_states() -> Vec<Self> {
        vec![Self::Pending, Self::Visited, Self::Skipped, Self::NotFound]
    }
}

impl fmt::Display for PathState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
