//! Storage traits and error types
//!
//! This module defines the trait interface for page store backends and
//! associated error types.

use crate::storage::{PageMeta, PageRecord};
use crate::url::Pathname;
use thiserror::Error;

/// Errors that can occur during page store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Page not found in store: {0}")]
    NotFound(Pathname),

    #[error("Invalid metadata for {pathname} at {path}: {reason}")]
    InvalidMeta {
        pathname: String,
        path: String,
        reason: String,
    },

    #[error("Markdown body missing for {pathname} at {path}")]
    MissingBody { pathname: Pathname, path: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true for genuine absence, as opposed to corruption or IO failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for page store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for page store implementations
///
/// A page store keeps one record per pathname. Records are written once by the
/// crawler and read by the crawler (cache hits) and the compiler.
pub trait PageStore {
    /// Returns true if a record exists for the pathname
    fn exists(&self, pathname: &Pathname) -> bool;

    /// Reads the record stored for a pathname
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - No record is stored for the pathname
    /// * `StoreError::InvalidMeta` - The metadata document does not match the `PageMeta` shape
    /// * `StoreError::MissingBody` - Metadata exists but the Markdown body does not
    fn read(&self, pathname: &Pathname) -> StoreResult<PageRecord>;

    /// Reads a record, mapping genuine absence to `None`
    ///
    /// Any other failure, corruption included, is still returned as an error.
    fn read_optional(&self, pathname: &Pathname) -> StoreResult<Option<PageRecord>> {
        match self.read(pathname) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes both the Markdown body and the metadata for `meta.url`
    ///
    /// Existing files are overwritten unconditionally.
    fn write(&mut self, meta: &PageMeta, markdown: &str) -> StoreResult<()>;

    /// Lists every stored pathname in sorted order
    fn list(&self) -> StoreResult<Vec<Pathname>>;
}
