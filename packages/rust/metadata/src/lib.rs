//! Best-effort Open Graph metadata fetching.
//!
//! Finds and publications link to external pages; when the data file leaves a
//! title, description or image blank, Pagesmith scrapes the linked page for
//! its `og:*` tags. Enrichment is optional by nature, so [`MetadataFetcher::fetch`]
//! never fails: any transport, status or decoding problem is logged and
//! yields empty metadata.

mod extract;

use std::time::Duration;

use pagesmith_shared::{FetchConfig, FetchedMetadata, PagesmithError, Result, non_empty};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument, warn};
use url::Url;

pub use extract::{extract_metadata, youtube_thumbnail};

/// Maximum number of redirects to follow per request.
const MAX_REDIRECTS: usize = 5;

/// Default timeout in seconds for a metadata request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// `Accept` header sent with every request.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// User-Agent string for metadata requests.
const USER_AGENT: &str = concat!("Pagesmith/", env!("CARGO_PKG_VERSION"), " (+metadata)");

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// HTTP client settings for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for each request in seconds.
    pub timeout_secs: u64,
    /// Skip certificate verification for this client only.
    pub accept_invalid_certs: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: true,
        }
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }
}

// ---------------------------------------------------------------------------
// MetadataFetcher
// ---------------------------------------------------------------------------

/// Scrapes page metadata over HTTP.
pub struct MetadataFetcher {
    client: Client,
}

impl MetadataFetcher {
    /// Build a fetcher with its own HTTP client.
    pub fn new(opts: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .danger_accept_invalid_certs(opts.accept_invalid_certs)
            .build()
            .map_err(|e| PagesmithError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch metadata for `url`.
    ///
    /// An absent or empty URL returns empty metadata without touching the
    /// network. Failures are logged and also return empty metadata.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: Option<&str>) -> FetchedMetadata {
        let Some(url) = non_empty(url) else {
            return FetchedMetadata::default();
        };

        match self.try_fetch(url).await {
            Ok(meta) => {
                debug!(
                    title = meta.title.as_deref().unwrap_or("(no title)"),
                    "metadata fetched"
                );
                meta
            }
            Err(e) => {
                warn!(url, error = %e, "metadata fetch failed, continuing without it");
                FetchedMetadata::default()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchedMetadata> {
        let page_url = Url::parse(url)
            .map_err(|e| PagesmithError::validation(format!("invalid URL '{url}': {e}")))?;

        let response = self
            .client
            .get(page_url.clone())
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| PagesmithError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagesmithError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PagesmithError::Network(format!("{url}: failed to read body: {e}")))?;

        Ok(extract_metadata(&body, &page_url))
    }
}
