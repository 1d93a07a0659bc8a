//! URL handling module for doc-mirror
//!
//! This module provides the `Pathname` identity type, same-origin filtering of
//! link targets, and relative path computation between stored pages.

mod pathname;
mod relative;

// Re-export main types and functions
pub use pathname::Pathname;
pub use relative::{parent_dir, relative_path};

use url::Url;

/// Builds the absolute URL of a pathname on the site
///
/// # Examples
///
/// ```
/// use doc_mirror::url::{page_url, Pathname};
/// use url::Url;
///
/// let root = Url::parse("https://valibot.dev").unwrap();
/// let pathname = Pathname::parse("/api/pipe/").unwrap();
/// assert_eq!(page_url(&root, &pathname).unwrap().as_str(), "https://valibot.dev/api/pipe/");
/// ```
pub fn page_url(site_root: &Url, pathname: &Pathname) -> Result<Url, url::ParseError> {
    site_root.join(pathname.as_str())
}

/// Returns true if `url` shares the site root's origin (scheme, host, port)
pub fn is_same_origin(url: &Url, site_root: &Url) -> bool {
    url.origin() == site_root.origin()
}

/// Resolves an `href` against the page it appears on and reduces it to a pathname
///
/// Returns `None` when the href cannot be resolved or points to a different
/// origin than the site root. Mirrors how a browser reports `anchor.href`:
/// the attribute is resolved against the document URL first.
///
/// # Examples
///
/// ```
/// use doc_mirror::url::same_origin_pathname;
/// use url::Url;
///
/// let root = Url::parse("https://valibot.dev").unwrap();
/// let page = Url::parse("https://valibot.dev/guides/introduction/").unwrap();
///
/// let local = same_origin_pathname("../installation/", &page, &root).unwrap();
/// assert_eq!(local.as_str(), "/guides/installation/");
///
/// assert!(same_origin_pathname("https://github.com/fabian-hiller", &page, &root).is_none());
/// ```
pub fn same_origin_pathname(href: &str, base: &Url, site_root: &Url) -> Option<Pathname> {
    let resolved = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!("Ignoring unresolvable link {:?}: {}", href, e);
            return None;
        }
    };

    if !is_same_origin(&resolved, site_root) {
        tracing::trace!("Ignoring external link {}", resolved);
        return None;
    }

    Pathname::from_url(&resolved)
}
