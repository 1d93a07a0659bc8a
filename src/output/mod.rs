//! Output module for producing the compiled reference document
//!
//! This module handles:
//! - Linearizing stored pages into one Markdown document
//! - Writing that document to disk
//! - Reporting statistics about the page store

mod compile;
pub mod stats;

pub use compile::{compile, write_compiled, CompiledDocument};
pub use stats::{load_statistics, print_statistics, MirrorStatistics};

use crate::config::Config;
use crate::storage::open_store;
use crate::Result;
use std::path::Path;

/// Compiles the store described by the configuration and writes the result
///
/// # Arguments
///
/// * `config` - Configuration naming the store root and compile settings
///
/// # Returns
///
/// * `Ok(CompiledDocument)` - The document that was written
/// * `Err(MirrorError)` - Compilation or the write failed
pub fn run_compile(config: &Config) -> Result<CompiledDocument> {
    let store = open_store(Path::new(&config.store.root));
    let document = compile(&store, &config.compile)?;
    write_compiled(&document, Path::new(&config.compile.output_path))?;
    Ok(document)
}
