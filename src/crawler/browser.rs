//! Browser session abstraction
//!
//! The crawler only needs two things from a browser: load a URL and hand back
//! the resulting document, and shut down cleanly. `HttpBrowser` implements
//! both on top of a reqwest client; tests substitute an in-memory double.

use crate::config::CrawlerConfig;
use crate::{MirrorError, Result};
use reqwest::Client;
use url::Url;

/// A document loaded by a browser session
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// URL of the loaded document, after redirects
    pub url: Url,

    /// HTTP status of the main document response
    pub status: u16,

    /// Serialized document HTML
    pub html: String,
}

/// A browser session that can navigate to pages
///
/// Only one navigation is in flight at a time. `close` is called exactly once
/// by the crawl coordinator; navigating after `close` is an error.
#[async_trait::async_trait]
pub trait Browser: Send {
    async fn navigate(&mut self, url: &Url) -> Result<LoadedPage>;

    async fn close(&mut self) -> Result<()>;
}

/// Builds the HTTP client used for page navigation
pub fn build_http_client(config: &CrawlerConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout().min(std::time::Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Browser session backed by a plain HTTP client
///
/// Redirects are followed and the final response body is exposed as the
/// document; no scripts are executed.
pub struct HttpBrowser {
    client: Option<Client>,
}

impl HttpBrowser {
    /// Opens a new session
    pub fn launch(config: &CrawlerConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        tracing::debug!("Browser session opened (user agent {:?})", config.user_agent);
        Ok(Self {
            client: Some(client),
        })
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait::async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &Url) -> Result<LoadedPage> {
        let client = self.client.as_ref().ok_or(MirrorError::BrowserClosed)?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| MirrorError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let html = response.text().await.map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(LoadedPage {
            url: final_url,
            status,
            html,
        })
    }

    async fn close(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            tracing::debug!("Browser session closed");
        }
        Ok(())
    }
}
