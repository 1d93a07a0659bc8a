//! doc-mirror: mirror a documentation site into Markdown and compile it
//!
//! This crate crawls a single documentation site from a fixed seed set, stores
//! every page as a Markdown body plus JSON navigation metadata, and linearizes
//! the stored pages into one reference document.

pub mod config;
pub mod convert;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for doc-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Malformed page {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Browser session already closed")]
    BrowserClosed,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Pathname construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathnameError {
    #[error("pathname must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("pathname contains a dot segment: {0:?}")]
    DotSegment(String),
}

/// Result type alias for doc-mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use convert::MarkdownConverter;
pub use state::{Frontier, PathState};
pub use storage::{FsPageStore, PageMeta, PageRecord, PageStore};
pub use url::Pathname;
