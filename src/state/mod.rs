//! State module for tracking crawl progress
//!
//! This module provides the traversal state of a single crawl run.
//!
//! # Components
//!
//! - `PathState`: Tracks the state of individual pathnames (pending, visited, skipped, not found)
//! - `Frontier`: Owns the pending queue, per-pathname states and the skip-list

mod frontier;
mod page_state;

// Re-export main types
pub use frontier::Frontier;
pub use page_state::PathState;
