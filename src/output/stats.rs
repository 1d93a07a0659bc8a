//! Statistics generation from the page store
//!
//! This module provides functionality for extracting and displaying
//! mirror statistics from the storage layer.

use crate::storage::PageStore;
use crate::url::Pathname;
use crate::Result;
use std::collections::BTreeSet;

/// Page store statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorStatistics {
    /// Number of stored pages
    pub stored_pages: usize,

    /// Outgoing links across all stored pages, duplicates included
    pub total_links: usize,

    /// Stored pages that have no `next` page
    pub pages_without_next: usize,

    /// Referenced pathnames (links, `next`, `prev`) not in the store, sorted
    pub missing_targets: Vec<Pathname>,
}

/// Loads statistics from the store
///
/// # Arguments
///
/// * `store` - The page store to walk
///
/// # Returns
///
/// * `Ok(MirrorStatistics)` - Successfully loaded statistics
/// * `Err(MirrorError)` - A stored page could not be read
pub fn load_statistics<S: PageStore + ?Sized>(store: &S) -> Result<MirrorStatistics> {
    let pathnames = store.list()?;
    let stored: BTreeSet<&Pathname> = pathnames.iter().collect();

    let mut total_links = 0;
    let mut pages_without_next = 0;
    let mut missing = BTreeSet::new();

    for pathname in &pathnames {
        let record = store.read(pathname)?;

        total_links += record.meta.links.len();
        if record.meta.next.is_none() {
            pages_without_next += 1;
        }

        for target in record.meta.referenced() {
            if !stored.contains(target) {
                missing.insert(target.clone());
            }
        }
    }

    Ok(MirrorStatistics {
        stored_pages: pathnames.len(),
        total_links,
        pages_without_next,
        missing_targets: missing.into_iter().collect(),
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &MirrorStatistics) {
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  Stored pages: {}", stats.stored_pages);
    println!("  Total links: {}", stats.total_links);
    println!("  Pages without next: {}", stats.pages_without_next);
    println!();

    if stats.missing_targets.is_empty() {
        println!("All referenced pages are stored.");
    } else {
        println!("Not yet stored ({}):", stats.missing_targets.len());
        for pathname in &stats.missing_targets {
            println!("  - {}", pathname);
        }
    }
}
