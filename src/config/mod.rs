//! Configuration module for doc-mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file with `--defaults`)
//! mirrors valibot.dev.
//!
//! # Example
//!
//! ```no_run
//! use doc_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("doc-mirror.toml")).unwrap();
//! println!("Store root: {}", config.store.root);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CompileConfig, Config, CrawlerConfig, SiteConfig, StoreConfig};

// Re-export parser functions
pub use parser::{default_config, load_config, parse_config, render_config};
