//! Lookup client for MvnKit
//!
//! This module provides the public lookup operations. Pages of the scraped host
//! go through the rate-limited [`PageFetcher`]; POMs come straight from the
//! artifact repository.

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::extract::{Extractor, SearchExtractor, SnippetExtractor, VersionExtractor};
use crate::fetcher::{PageFetcher, SEARCH_PATH};
use crate::repository::RepositoryClient;
use crate::types::{Artifact, Coordinates, DependencySnippets, SearchOutcome, VersionListing};
use tracing::info;
use url::Url;

/// Default number of search results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Client for artifact lookups
///
/// Clones share the pacing clock, so concurrent lookups from clones are still
/// spaced out against the scraped host.
#[derive(Debug, Clone)]
pub struct MvnClient {
    base_url: Url,
    pages: PageFetcher,
    repository: RepositoryClient,
}

impl MvnClient {
    /// Create a client for the public hosts
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            base_url,
            pages: PageFetcher::new(&config)?,
            repository: RepositoryClient::new(&config)?,
        })
    }

    /// Search artifacts by free text, keeping at most `max_results` hits
    pub async fn search_artifacts(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchOutcome, FetchError> {
        let mut url = self.base_url.join(SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("q", query);
        info!(url = %url, "Searching artifacts");

        let body = self.pages.fetch(&url).await?;
        let artifacts = SearchExtractor::new(max_results).extract_html(&body, &url);
        Ok(SearchOutcome::new(query, artifacts))
    }

    /// List the versions of an artifact in page order
    pub async fn artifact_versions(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<VersionListing, FetchError> {
        let url = self.artifact_page(&[group_id, artifact_id])?;
        info!(url = %url, "Fetching versions");

        let body = self.pages.fetch(&url).await?;
        let versions = VersionExtractor::new().extract_html(&body, &url);
        Ok(VersionListing::new(group_id, artifact_id, versions))
    }

    /// Fetch the POM of an artifact version verbatim
    pub async fn manifest(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<String, FetchError> {
        let coordinates = Coordinates::new(group_id, artifact_id, version);
        info!(coordinates = %coordinates, "Fetching POM");
        self.repository.fetch_manifest(&coordinates).await
    }

    /// Build-tool declarations for an artifact version
    pub async fn dependency_snippets(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<DependencySnippets, FetchError> {
        let url = self.artifact_page(&[group_id, artifact_id, version])?;
        info!(url = %url, "Fetching dependency snippets");

        let body = self.pages.fetch(&url).await?;
        let coordinates = Coordinates::new(group_id, artifact_id, version);
        Ok(SnippetExtractor::new(coordinates).extract_html(&body, &url))
    }

    /// The first listed version of an artifact, if any
    ///
    /// The scraped host usually lists newest first, but this is the page order,
    /// not a version comparison.
    pub async fn latest_artifact(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Option<Artifact>, FetchError> {
        let listing = self.artifact_versions(group_id, artifact_id).await?;
        Ok(listing.versions.into_iter().next().map(|entry| Artifact {
            group_id: listing.group_id,
            artifact_id: listing.artifact_id,
            version: entry.version,
            url: entry.url,
            last_updated: entry.release_date,
            ..Default::default()
        }))
    }

    /// URL of `/artifact/{segments...}` on the scraped host
    fn artifact_page(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .clear()
            .push("artifact")
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_page_url() {
        let client = MvnClient::new().unwrap();
        let url = client
            .artifact_page(&["org.springframework", "spring-core", "6.1.5"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://mvnrepository.com/artifact/org.springframework/spring-core/6.1.5"
        );
    }

    #[test]
    fn test_artifact_page_escapes_segments() {
        let client = MvnClient::new().unwrap();
        let url = client.artifact_page(&["a b", "c/d"]).unwrap();
        assert_eq!(url.as_str(), "https://mvnrepository.com/artifact/a%20b/c%2Fd");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::builder().base_url("not a url").build();
        assert!(matches!(
            MvnClient::with_config(config),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
