//! MvnKit - Maven artifact lookups for AI tools
//!
//! This crate searches artifacts, lists versions and builds dependency
//! snippets by scraping the public package index, and fetches POMs from the
//! artifact repository.
//!
//! ## Scraping
//!
//! Requests to the package index go through a rate-limited fetcher: every
//! dispatch is spaced out with random jitter, and 403 responses (the site's
//! anti-bot block) are retried with a growing backoff. Pages are parsed by
//! [`Extractor`]s that degrade gracefully when markup is missing.
//!
//! Entry points:
//! - [`MvnClient`] - the lookup operations
//! - [`Tools`] - the same operations as named tools with text output

pub mod client;
pub mod config;
mod error;
pub mod extract;
mod fetcher;
mod pacing;
mod repository;
pub mod tool;
mod types;

pub use client::{MvnClient, DEFAULT_MAX_RESULTS};
pub use config::{ClientConfig, ClientConfigBuilder, PacingConfig, RetryConfig};
pub use error::{ErrorKind, FetchError};
pub use extract::Extractor;
pub use fetcher::{PageFetcher, SEARCH_PATH};
pub use pacing::Pacer;
pub use repository::RepositoryClient;
pub use tool::{ToolCallError, ToolKind, ToolOutput, Tools};
pub use types::{
    Artifact, Coordinates, DependencySnippets, SearchOutcome, VersionEntry, VersionListing,
    LATEST_VERSION,
};

/// Default package index
pub const DEFAULT_BASE_URL: &str = "https://mvnrepository.com";

/// Default artifact repository
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2";

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:139.0) Gecko/20100101 Firefox/139.0";

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# MvnKit Tools

Look up Maven artifacts on mvnrepository.com and Maven Central.

## Tools

### search_maven_artifacts
Search artifacts by free text.
- `query` (required): search terms
- `maxResults` (optional): maximum number of results (default: 10)

### get_artifact_versions
List versions of an artifact, as ordered on the site (usually newest first).
- `groupId` (required), `artifactId` (required)

### get_pom_xml
Fetch the pom.xml of an artifact version from Maven Central.
- `groupId`, `artifactId`, `version` (all required)

### get_dependency_snippets
Maven, Gradle, SBT and Ivy declarations for an artifact version.
- `groupId`, `artifactId`, `version` (all required)

## Examples

### Search
```json
{"query": "jackson databind", "maxResults": 5}
```

### Snippets
```json
{"groupId": "com.google.guava", "artifactId": "guava", "version": "33.0.0-jre"}
```

## Behavior
- Requests to mvnrepository.com are spaced at least 3 seconds apart
- Blocked requests (HTTP 403) are retried 3 times with growing backoff
- Missing page elements drop results rather than failing the call
- Maven and Gradle snippets fall back to standard declarations
"#;
