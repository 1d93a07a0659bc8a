use crate::convert::MarkdownOptions;
use crate::url::Pathname;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Main configuration structure for doc-mirror
///
/// Every section is optional; missing sections and keys take the defaults
/// for mirroring valibot.dev.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub store: StoreConfig,
    pub compile: CompileConfig,
    pub markdown: MarkdownOptions,
}

/// The site being mirrored and where things live on its pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin of the site, e.g. `https://valibot.dev`
    pub root: String,

    /// Pathnames the crawl starts from, in order
    pub seeds: Vec<Pathname>,

    /// Pathnames that are never fetched or expanded
    pub skip: Vec<Pathname>,

    /// CSS selector of the main content region
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// CSS selector of nodes removed from the content region
    #[serde(rename = "hidden-selector")]
    pub hidden_selector: String,

    /// `aria-label` of the "next page" anchor
    #[serde(rename = "next-label")]
    pub next_label: String,

    /// `aria-label` of the "previous page" anchor
    #[serde(rename = "prev-label")]
    pub prev_label: String,
}

impl SiteConfig {
    /// Parses the site root
    pub fn root_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.root)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site root '{}': {}", self.root, e)))
    }
}

fn pathnames(values: &[&'static str]) -> Vec<Pathname> {
    values.iter().copied().map(Pathname::from_static).collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "https://valibot.dev".to_string(),
            seeds: pathnames(&["/api/", "/guides/introduction/"]),
            skip: pathnames(&[
                "/api/VariantIssue/",
                "/api/sortItem/",
                "/api/unionWithRest/",
                "/api/nonUndefinedable/",
                "/api/UnknownDataset/",
                "/api/NanoIDIssue/",
                "/api/NanoIDAction/",
                "/api/types/",
                "/thesis.pdf",
            ]),
            content_selector: "main article".to_string(),
            hidden_selector: "[aria-hidden=\"true\"]".to_string(),
            next_label: "Next page".to_string(),
            prev_label: "Previous page".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between two fresh fetches (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// HTTP request timeout (seconds)
    pub timeout: u64,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay: 500,
            user_agent: format!("doc-mirror/{}", env!("CARGO_PKG_VERSION")),
            timeout: 30,
        }
    }
}

/// Page store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the mirrored pages
    pub root: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: "docs".to_string(),
        }
    }
}

/// Compiled document configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Document title, rendered as the top-level heading
    pub title: String,

    /// First page of the `next` chain
    pub start: Pathname,

    /// Page whose links are appended after the chain
    pub index: Pathname,

    /// Where the compiled document is written
    #[serde(rename = "output-path")]
    pub output_path: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            title: "Valibot Guides and API Reference".to_string(),
            start: Pathname::from_static("/guides/introduction/"),
            index: Pathname::from_static("/api/"),
            output_path: "docs.md".to_string(),
        }
    }
}
