//! Page extraction
//!
//! Pulls the pieces the mirror needs out of a loaded document:
//! - The content region, with hidden nodes removed, as HTML
//! - Same-origin link targets inside the content region
//! - The "next page" / "previous page" navigation targets

use crate::config::SiteConfig;
use crate::url::{same_origin_pathname, Pathname};
use crate::{ConfigError, ConfigResult, MirrorError, Result};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors describing where things live on the site's pages
#[derive(Debug, Clone)]
pub struct SiteProfile {
    site_root: Url,
    content: Selector,
    hidden: Selector,
    next: Selector,
    prev: Selector,
    links: Selector,
}

fn compile_selector(source: &str) -> ConfigResult<Selector> {
    Selector::parse(source)
        .map_err(|e| ConfigError::InvalidSelector(format!("{:?}: {}", source, e)))
}

/// Selector for the navigation anchor carrying an `aria-label`
pub fn label_selector(label: &str) -> String {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("a[aria-label=\"{}\"]", escaped)
}

impl SiteProfile {
    pub fn new(site: &SiteConfig) -> ConfigResult<Self> {
        Ok(Self {
            site_root: site.root_url()?,
            content: compile_selector(&site.content_selector)?,
            hidden: compile_selector(&site.hidden_selector)?,
            next: compile_selector(&label_selector(&site.next_label))?,
            prev: compile_selector(&label_selector(&site.prev_label))?,
            links: compile_selector("a[href]")?,
        })
    }

    pub fn site_root(&self) -> &Url {
        &self.site_root
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub next: Option<Pathname>,
    pub prev: Option<Pathname>,
    /// Same-origin targets of `a[href]` in the content region, document order
    pub links: Vec<Pathname>,
    /// Inner HTML of the content region after hidden nodes were removed
    pub content_html: String,
}

/// Extracts the content region, links and navigation from a loaded document
///
/// `page_url` is the base for resolving relative hrefs. Fails with
/// `MirrorError::Malformed` when the document has no content region.
pub fn extract_page(html: &str, page_url: &Url, profile: &SiteProfile) -> Result<ExtractedPage> {
    let mut document = Html::parse_document(html);

    let content_id = document
        .select(&profile.content)
        .next()
        .map(|element| element.id())
        .ok_or_else(|| MirrorError::Malformed {
            url: page_url.to_string(),
            reason: "content region not found".to_string(),
        })?;

    let hidden: Vec<NodeId> = content_region(&document, content_id)
        .map(|content| {
            content
                .select(&profile.hidden)
                .map(|element| element.id())
                .filter(|id| *id != content_id)
                .collect()
        })
        .unwrap_or_default();

    if !hidden.is_empty() {
        tracing::trace!("Removing {} hidden nodes from {}", hidden.len(), page_url);
    }
    for id in hidden {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let content = content_region(&document, content_id).ok_or_else(|| MirrorError::Malformed {
        url: page_url.to_string(),
        reason: "content region vanished".to_string(),
    })?;

    let links = content
        .select(&profile.links)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| same_origin_pathname(href, page_url, &profile.site_root))
        .collect();

    let nav_target = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| same_origin_pathname(href, page_url, &profile.site_root))
    };

    Ok(ExtractedPage {
        next: nav_target(&profile.next),
        prev: nav_target(&profile.prev),
        links,
        content_html: content.inner_html(),
    })
}

fn content_region(document: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    document.tree.get(id).and_then(ElementRef::wrap)
}
