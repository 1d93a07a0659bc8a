//! Filesystem storage implementation
//!
//! Each page is stored as two files under the store root:
//!
//! ```text
//! {root}/
//! ├── guides/
//! │   ├── introduction.md     # converted Markdown body
//! │   └── introduction.json   # PageMeta, pretty-printed
//! └── api/
//!     ├── _ValiError.md       # upper-case segments carry a `_` marker
//!     └── _ValiError.json
//! ```

use crate::storage::paths::{markdown_file, meta_file};
use crate::storage::traits::{PageStore, StoreError, StoreResult};
use crate::storage::{PageMeta, PageRecord};
use crate::url::Pathname;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Page store backed by a directory tree
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    /// Creates a store rooted at the given directory
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of the Markdown file for a pathname
    pub fn markdown_path(&self, pathname: &Pathname) -> PathBuf {
        self.resolve(&markdown_file(pathname))
    }

    /// Absolute path of the metadata file for a pathname
    pub fn meta_path(&self, pathname: &Pathname) -> PathBuf {
        self.resolve(&meta_file(pathname))
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    fn read_meta(&self, pathname: &Pathname) -> StoreResult<PageMeta> {
        let path = self.meta_path(pathname);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(pathname.clone()));
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| StoreError::InvalidMeta {
            pathname: pathname.to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn collect_meta_files(dir: &Path, found: &mut Vec<PathBuf>) -> StoreResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: dir.display().to_string(),
                    source: e,
                });
            }
        };

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();

            if path.is_dir() {
                Self::collect_meta_files(&path, found)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                found.push(path);
            }
        }

        Ok(())
    }
}

impl PageStore for FsPageStore {
    fn exists(&self, pathname: &Pathname) -> bool {
        self.meta_path(pathname).is_file()
    }

    fn read(&self, pathname: &Pathname) -> StoreResult<PageRecord> {
        let meta = self.read_meta(pathname)?;

        let path = self.markdown_path(pathname);
        let markdown = match fs::read_to_string(&path) {
            Ok(markdown) => markdown,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::MissingBody {
                    pathname: pathname.clone(),
                    path: path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        if meta.url != *pathname {
            tracing::debug!(
                "Record for {} was stored under url {}",
                pathname,
                meta.url
            );
        }

        Ok(PageRecord { meta, markdown })
    }

    fn write(&mut self, meta: &PageMeta, markdown: &str) -> StoreResult<()> {
        let markdown_path = self.markdown_path(&meta.url);
        let meta_path = self.meta_path(&meta.url);

        if let Some(parent) = markdown_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        fs::write(&markdown_path, markdown).map_err(|e| StoreError::Io {
            path: markdown_path.display().to_string(),
            source: e,
        })?;

        let json = serde_json::to_string_pretty(meta)?;
        fs::write(&meta_path, json).map_err(|e| StoreError::Io {
            path: meta_path.display().to_string(),
            source: e,
        })?;

        tracing::debug!("Stored {} at {}", meta.url, markdown_path.display());
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<Pathname>> {
        let mut files = Vec::new();
        Self::collect_meta_files(&self.root, &mut files)?;

        let mut pathnames = Vec::with_capacity(files.len());
        for file in files {
            let content = fs::read_to_string(&file).map_err(|e| StoreError::Io {
                path: file.display().to_string(),
                source: e,
            })?;

            #[derive(serde::Deserialize)]
            struct UrlOnly {
                url: Pathname,
            }

            let parsed: UrlOnly =
                serde_json::from_str(&content).map_err(|e| StoreError::InvalidMeta {
                    pathname: "<unknown>".to_string(),
                    path: file.display().to_string(),
                    reason: e.to_string(),
                })?;
            pathnames.push(parsed.url);
        }

        pathnames.sort();
        pathnames.dedup();
        Ok(pathnames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn p(s: &str) -> Pathname {
        Pathname::parse(s).unwrap()
    }

    fn sample_meta() -> PageMeta {
        PageMeta {
            url: p("/guides/introduction/"),
            next: Some(p("/guides/installation/")),
            prev: None,
            links: vec![p("/api/pipe/"), p("/api/ValiError/"), p("/api/pipe/")],
        }
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path());
        let meta = sample_meta();

        store.write(&meta, "Introduction\n------------\n\nHello").unwrap();

        let record = store.read(&meta.url).unwrap();
        assert_eq!(record.meta, meta);
        assert_eq!(record.markdown, "Introduction\n------------\n\nHello");
    }

    #[test]
    fn test_write_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path().join("docs"));
        let mut meta = sample_meta();
        meta.url = p("/api/Deep/Nested/");

        store.write(&meta, "body").unwrap();

        assert!(dir.path().join("docs/api/_Deep/_Nested.md").is_file());
        assert!(dir.path().join("docs/api/_Deep/_Nested.json").is_file());
    }

    #[test]
    fn test_meta_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path());
        let meta = PageMeta {
            url: p("/api/"),
            next: None,
            prev: Some(p("/guides/")),
            links: vec![p("/api/pipe/")],
        };

        store.write(&meta, "").unwrap();

        let json = fs::read_to_string(dir.path().join("api.json")).unwrap();
        assert_eq!(
            json,
            "{\n  \"url\": \"/api/\",\n  \"prev\": \"/guides/\",\n  \"links\": [\n    \"/api/pipe/\"\n  ]\n}"
        );
    }

    #[test]
    fn test_exists() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path());
        let meta = sample_meta();

        assert!(!store.exists(&meta.url));
        store.write(&meta, "x").unwrap();
        assert!(store.exists(&meta.url));
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());

        let err = store.read(&p("/nope/")).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.read_optional(&p("/nope/")).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_meta_is_not_absence() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("broken.md"), "body").unwrap();

        let err = store.read_optional(&p("/broken/")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMeta { .. }));
    }

    #[test]
    fn test_meta_with_relative_link_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());
        fs::write(
            dir.path().join("page.json"),
            r#"{ "url": "/page/", "links": ["relative/"] }"#,
        )
        .unwrap();
        fs::write(dir.path().join("page.md"), "body").unwrap();

        let err = store.read(&p("/page/")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMeta { .. }));
    }

    #[test]
    fn test_meta_missing_links_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());
        fs::write(dir.path().join("page.json"), r#"{ "url": "/page/" }"#).unwrap();
        fs::write(dir.path().join("page.md"), "body").unwrap();

        let err = store.read(&p("/page/")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMeta { .. }));
    }

    #[test]
    fn test_meta_with_bad_next_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());
        fs::write(
            dir.path().join("page.json"),
            r#"{ "url": "/page/", "next": "https://elsewhere.dev/", "links": [] }"#,
        )
        .unwrap();
        fs::write(dir.path().join("page.md"), "body").unwrap();

        let err = store.read(&p("/page/")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMeta { .. }));
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path());
        fs::write(dir.path().join("page.json"), r#"{ "url": "/page/", "links": [] }"#).unwrap();

        let err = store.read_optional(&p("/page/")).unwrap_err();
        assert!(matches!(err, StoreError::MissingBody { .. }));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path());
        let meta = sample_meta();

        store.write(&meta, "first").unwrap();
        store.write(&meta, "second").unwrap();

        assert_eq!(store.read(&meta.url).unwrap().markdown, "second");
    }

    #[test]
    fn test_list() {
        let dir = TempDir::new().unwrap();
        let mut store = FsPageStore::new(dir.path());

        for url in ["/guides/introduction/", "/api/", "/api/ValiError/"] {
            let meta = PageMeta {
                url: p(url),
                next: None,
                prev: None,
                links: vec![],
            };
            store.write(&meta, "").unwrap();
        }

        let listed = store.list().unwrap();
        assert_eq!(
            listed,
            vec![p("/api/"), p("/api/ValiError/"), p("/guides/introduction/")]
        );
    }

    #[test]
    fn test_list_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FsPageStore::new(dir.path().join("missing"));
        assert!(store.list().unwrap().is_empty());
    }
}
