//! Storage module for persisting mirrored pages
//!
//! This module handles all page store operations, including:
//! - Deriving collision-free file paths from pathnames
//! - Writing Markdown bodies and JSON metadata side by side
//! - Typed reading of stored records, keeping absence and corruption apart

mod fs;
mod paths;
mod traits;

pub use fs::FsPageStore;
pub use paths::{derived_stem, markdown_file, meta_file};
pub use traits::{PageStore, StoreError, StoreResult};

use crate::url::Pathname;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opens the filesystem page store rooted at `path`
pub fn open_store(path: &Path) -> FsPageStore {
    FsPageStore::new(path)
}

/// Navigation and link metadata persisted beside each page body
///
/// The JSON form omits absent `next`/`prev` keys:
///
/// ```json
/// {
///   "url": "/guides/introduction/",
///   "next": "/guides/installation/",
///   "links": ["/api/pipe/"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Pathname the page was fetched from
    pub url: Pathname,

    /// Target of the page's "next page" navigation link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Pathname>,

    /// Target of the page's "previous page" navigation link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Pathname>,

    /// Same-origin link targets in the content region, document order, duplicates kept
    pub links: Vec<Pathname>,
}

impl PageMeta {
    /// Every pathname this page refers to: `next`, `prev`, then `links`
    pub fn referenced(&self) -> impl Iterator<Item = &Pathname> {
        self.next
            .iter()
            .chain(self.prev.iter())
            .chain(self.links.iter())
    }
}

/// A stored page: metadata plus converted Markdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub meta: PageMeta,
    pub markdown: String,
}
