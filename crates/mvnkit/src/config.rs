//! Client configuration
//!
//! Defaults target the public hosts with the pacing the scraped host tolerates.
//! Tests and tools override hosts and delays through [`ClientConfigBuilder`].

use crate::{DEFAULT_BASE_URL, DEFAULT_REPOSITORY_URL, DEFAULT_USER_AGENT};
use std::time::Duration;

/// Per-attempt timeout for scraped-host pages
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for artifact-host manifest requests
pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Pacing applied before every request to the scraped host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// Minimum time between two dispatches
    pub min_spacing: Duration,
    /// Lower bound of the random delay added to every dispatch (inclusive)
    pub jitter_min: Duration,
    /// Upper bound of the random delay added to every dispatch (exclusive)
    pub jitter_max: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_millis(3000),
            jitter_min: Duration::from_millis(2000),
            jitter_max: Duration::from_millis(6000),
        }
    }
}

impl PacingConfig {
    /// Pacing with no jitter, only the minimum spacing
    pub fn fixed(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }
}

/// Retry policy for blocked (403) responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff grows by this step per retry: `(retry + 1) * step`
    pub backoff_step: Duration,
    /// Random delay added to each backoff, in `[0, backoff_jitter)`
    pub backoff_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_step: Duration::from_millis(5000),
            backoff_jitter: Duration::from_millis(3000),
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `retry` (zero-based), without jitter
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.backoff_step.saturating_mul(retry + 1)
    }
}

/// Configuration shared by the scraped-host fetcher and the artifact-host client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scraped host, without trailing slash
    pub base_url: String,
    /// Artifact host repository root, without trailing slash
    pub repository_url: String,
    /// User-Agent sent to both hosts
    pub user_agent: String,
    /// Per-attempt timeout for scraped-host pages
    pub page_timeout: Duration,
    /// Timeout for manifest requests
    pub manifest_timeout: Duration,
    /// Dispatch pacing for the scraped host
    pub pacing: PacingConfig,
    /// 403 retry policy for the scraped host
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: PAGE_TIMEOUT,
            manifest_timeout: MANIFEST_TIMEOUT,
            pacing: PacingConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the scraped host
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = trim_trailing_slash(url.into());
        self
    }

    /// Set the artifact host repository root
    pub fn repository_url(mut self, url: impl Into<String>) -> Self {
        self.config.repository_url = trim_trailing_slash(url.into());
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Set the per-attempt page timeout
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.config.page_timeout = timeout;
        self
    }

    /// Set the manifest timeout
    pub fn manifest_timeout(mut self, timeout: Duration) -> Self {
        self.config.manifest_timeout = timeout;
        self
    }

    /// Set dispatch pacing
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.config.pacing = pacing;
        self
    }

    /// Set the 403 retry policy
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
