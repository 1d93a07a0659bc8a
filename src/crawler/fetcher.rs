//! Page fetcher
//!
//! Loads one pathname through the browser session, classifies the response,
//! and turns a successful page into a storable record:
//! - HTTP 404 becomes `FetchResult::NotFound`
//! - Any other non-success status is fatal
//! - The content region is converted to Markdown, links to metadata

use crate::convert::MarkdownConverter;
use crate::crawler::browser::Browser;
use crate::crawler::parser::{extract_page, SiteProfile};
use crate::storage::PageMeta;
use crate::url::{page_url, Pathname};
use crate::{MirrorError, Result};

/// A freshly fetched page, ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub meta: PageMeta,
    pub markdown: String,
}

/// Result of fetching a pathname
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The page loaded and was converted
    Fetched(FetchedPage),

    /// The site answered 404
    NotFound,
}

/// Fetches pages of one site and converts them
pub struct PageFetcher {
    profile: SiteProfile,
    converter: MarkdownConverter,
}

impl PageFetcher {
    pub fn new(profile: SiteProfile, converter: MarkdownConverter) -> Self {
        Self { profile, converter }
    }

    /// Navigates to `pathname` and extracts its record
    ///
    /// # Errors
    ///
    /// * `MirrorError::UnexpectedStatus` - non-success status other than 404
    /// * `MirrorError::Malformed` - the page has no content region
    /// * Any navigation error reported by the browser
    pub async fn fetch<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
        pathname: &Pathname,
    ) -> Result<FetchResult> {
        let url = page_url(self.profile.site_root(), pathname)?;
        let loaded = browser.navigate(&url).await?;

        if loaded.status == 404 {
            return Ok(FetchResult::NotFound);
        }

        if !(200..300).contains(&loaded.status) {
            return Err(MirrorError::UnexpectedStatus {
                url: url.to_string(),
                status: loaded.status,
            });
        }

        if Pathname::from_url(&loaded.url).as_ref() != Some(pathname) {
            tracing::debug!("{} was served from {}", pathname, loaded.url);
        }

        let extracted = extract_page(&loaded.html, &loaded.url, &self.profile)?;
        let markdown = self.converter.convert(&extracted.content_html, pathname);

        Ok(FetchResult::Fetched(FetchedPage {
            meta: PageMeta {
                url: pathname.clone(),
                next: extracted.next,
                prev: extracted.prev,
                links: extracted.links,
            },
            markdown,
        }))
    }
}
