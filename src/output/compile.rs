//! Compilation of stored pages into a single reference document
//!
//! The document is the primary chain (the start page followed along `next`)
//! and then the index page followed by every page it links to.

use crate::config::CompileConfig;
use crate::storage::{PageRecord, PageStore};
use crate::url::Pathname;
use crate::Result;
use std::collections::HashSet;
use std::path::Path;

/// The compiled document and what went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    /// Full Markdown text
    pub markdown: String,

    /// Pathnames whose bodies were appended, in order
    pub sections: Vec<Pathname>,

    /// Index links that were not in the store
    pub missing: Vec<Pathname>,
}

struct DocumentBuilder {
    markdown: String,
    sections: Vec<Pathname>,
    missing: Vec<Pathname>,
}

impl DocumentBuilder {
    fn new(title: &str) -> Self {
        Self {
            markdown: format!("# {}\n\n", title),
            sections: Vec::new(),
            missing: Vec::new(),
        }
    }

    fn append(&mut self, pathname: &Pathname, record: &PageRecord) {
        self.markdown.push_str(record.markdown.trim_end());
        self.markdown.push_str("\n\n");
        self.sections.push(pathname.clone());
    }

    fn finish(self) -> CompiledDocument {
        CompiledDocument {
            markdown: self.markdown,
            sections: self.sections,
            missing: self.missing,
        }
    }
}

/// Linearizes the stored pages into one document
///
/// # Errors
///
/// Any store error on the primary chain or the index page aborts. For the
/// index's links only genuine absence is tolerated: it is logged, recorded in
/// `missing` and skipped.
pub fn compile<S: PageStore + ?Sized>(store: &S, config: &CompileConfig) -> Result<CompiledDocument> {
    let mut document = DocumentBuilder::new(&config.title);

    let mut chain_seen = HashSet::new();
    let mut current = Some(config.start.clone());
    while let Some(pathname) = current {
        if !chain_seen.insert(pathname.clone()) {
            tracing::warn!("Next-page chain loops back to {}, stopping it there", pathname);
            break;
        }

        let record = store.read(&pathname)?;
        document.append(&pathname, &record);
        current = record.meta.next;
    }
    tracing::debug!("Primary chain has {} pages", chain_seen.len());

    let index = store.read(&config.index)?;
    document.append(&config.index, &index);

    for link in &index.meta.links {
        match store.read(link) {
            Ok(record) => document.append(link, &record),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Site not found: {}", link);
                document.missing.push(link.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let compiled = document.finish();
    tracing::info!(
        "Compiled {} sections ({} missing)",
        compiled.sections.len(),
        compiled.missing.len()
    );
    Ok(compiled)
}

/// Writes the compiled document, creating parent directories as needed
pub fn write_compiled(document: &CompiledDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &document.markdown)?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), document.markdown.len());
    Ok(())
}
