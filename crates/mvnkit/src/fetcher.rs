//! Rate-limited fetcher for the scraped host
//!
//! Every request is paced through a shared [`Pacer`]; 403 responses are treated
//! as anti-bot blocks and retried with a growing backoff.

use crate::config::{ClientConfig, RetryConfig};
use crate::error::FetchError;
use crate::pacing::{random_between, Pacer};
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, PRAGMA,
    REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Path of the search endpoint; requests to it carry no Referer
pub const SEARCH_PATH: &str = "/search";

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 5;

/// Browser-like headers sent with every page request
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("sec-gpc", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("priority", "u=0, i"),
];

/// Fetcher for HTML pages of the scraped host
///
/// Cloning is cheap; clones share the HTTP client and the pacing clock.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    pacer: Arc<Pacer>,
    retry: RetryConfig,
    referer: HeaderValue,
}

impl PageFetcher {
    /// Create a fetcher from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        for &(name, value) in BROWSER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.page_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .cookie_store(true)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        let referer = HeaderValue::from_str(&config.base_url)
            .map_err(|_| FetchError::InvalidUrl(config.base_url.clone()))?;

        Ok(Self {
            client,
            pacer: Arc::new(Pacer::new(config.pacing.clone())),
            retry: config.retry.clone(),
            referer,
        })
    }

    /// Fetch a page body
    ///
    /// Fails with [`FetchError::Blocked`] once 403 retries are exhausted and with
    /// a network error for any other failure.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut retry = 0;
        loop {
            match self.fetch_once(url).await {
                Err(FetchError::Status { status: 403, .. }) if retry < self.retry.max_retries => {
                    let backoff = self.retry.backoff_for(retry)
                        + random_between(Duration::ZERO, self.retry.backoff_jitter);
                    warn!(
                        url = %url,
                        attempt = retry + 1,
                        max_retries = self.retry.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Got 403, backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                    retry += 1;
                }
                Err(FetchError::Status { status: 403, .. }) => {
                    warn!(url = %url, retries = retry, "Still blocked after retries");
                    return Err(FetchError::Blocked { retries: retry });
                }
                other => return other,
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let mut request = self.client.get(url.as_str());
        if !is_search_path(url.path()) {
            request = request.header(REFERER, self.referer.clone());
        }

        self.pacer.wait().await;
        debug!(url = %url, "Dispatching request");

        let response = request.send().await.map_err(FetchError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }
}

/// True for the search endpoint and paths below it, not for `/searchable` and the like
fn is_search_path(path: &str) -> bool {
    path.strip_prefix(SEARCH_PATH)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
