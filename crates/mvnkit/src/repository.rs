//! Artifact repository client
//!
//! The repository host serves POMs as static files and has no anti-bot
//! defense, so requests here are neither paced nor retried.

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::types::Coordinates;
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::debug;

/// Client for the artifact repository host
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    client: reqwest::Client,
    repository_url: String,
    user_agent: HeaderValue,
}

impl RepositoryClient {
    /// Create a client from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.manifest_timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(Self {
            client,
            repository_url: config.repository_url.clone(),
            user_agent: HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        })
    }

    /// URL of the POM for the given coordinates
    pub fn manifest_url(&self, coordinates: &Coordinates) -> String {
        format!("{}/{}", self.repository_url, coordinates.manifest_path())
    }

    /// Fetch the POM verbatim
    pub async fn fetch_manifest(&self, coordinates: &Coordinates) -> Result<String, FetchError> {
        let url = self.manifest_url(coordinates);
        debug!(url = %url, "Fetching manifest");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }
}
