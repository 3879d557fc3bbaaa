//! Tool contract for MvnKit
//!
//! Names, descriptions and input schemas of the lookup tools, plus dispatch of
//! a tool call to [`MvnClient`] and rendering of the result as text.

use crate::client::{MvnClient, DEFAULT_MAX_RESULTS};
use crate::error::FetchError;
use crate::types::{Artifact, Coordinates, DependencySnippets, SearchOutcome, VersionListing};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input of `search_maven_artifacts`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Search query for Maven artifacts
    pub query: String,

    /// Maximum number of results to return (default: 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

/// Input of `get_artifact_versions`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInput {
    /// The group ID of the artifact (e.g., 'org.springframework')
    pub group_id: String,
    /// The artifact ID (e.g., 'spring-core')
    pub artifact_id: String,
}

/// Lookup tools exposed to protocol clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SearchArtifacts,
    ArtifactVersions,
    PomXml,
    DependencySnippets,
}

impl ToolKind {
    /// All tools, in listing order
    pub const ALL: [ToolKind; 4] = [
        ToolKind::SearchArtifacts,
        ToolKind::ArtifactVersions,
        ToolKind::PomXml,
        ToolKind::DependencySnippets,
    ];

    /// Tool name as exposed over the protocol
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::SearchArtifacts => "search_maven_artifacts",
            ToolKind::ArtifactVersions => "get_artifact_versions",
            ToolKind::PomXml => "get_pom_xml",
            ToolKind::DependencySnippets => "get_dependency_snippets",
        }
    }

    /// Look up a tool by protocol name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Tool description for LLM consumption
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::SearchArtifacts => "Search for Maven artifacts on mvnrepository.com",
            ToolKind::ArtifactVersions => "Get all available versions of a Maven artifact",
            ToolKind::PomXml => "Fetch the pom.xml file for a specific artifact version",
            ToolKind::DependencySnippets => {
                "Get Maven, Gradle, and other build tool dependency snippets for an artifact"
            }
        }
    }

    /// Input schema as JSON
    pub fn input_schema(self) -> serde_json::Value {
        let schema = match self {
            ToolKind::SearchArtifacts => schema_for!(SearchInput),
            ToolKind::ArtifactVersions => schema_for!(ArtifactInput),
            ToolKind::PomXml | ToolKind::DependencySnippets => schema_for!(Coordinates),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Tool definition as listed by `tools/list`
    pub fn definition(self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

/// Errors in the tool call itself, as opposed to lookup failures
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
}

/// Text result of a tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    /// True when the lookup failed and `text` describes the failure
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// Lookup tools bound to a client
#[derive(Debug, Clone)]
pub struct Tools {
    client: MvnClient,
}

impl Tools {
    pub fn new(client: MvnClient) -> Self {
        Self { client }
    }

    /// Definitions of all tools
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        ToolKind::ALL.iter().map(|tool| tool.definition()).collect()
    }

    /// Run a tool by name
    ///
    /// Lookup failures become error text in the output; only unknown tools and
    /// malformed arguments are returned as errors.
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolCallError> {
        let tool =
            ToolKind::from_name(name).ok_or_else(|| ToolCallError::UnknownTool(name.to_string()))?;

        let output = match tool {
            ToolKind::SearchArtifacts => {
                let input: SearchInput = serde_json::from_value(arguments)?;
                let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
                match self.client.search_artifacts(&input.query, max_results).await {
                    Ok(outcome) => ToolOutput::ok(render_search(&outcome)),
                    Err(e) => ToolOutput::error(format!(
                        "Error searching for Maven artifacts: {}",
                        e
                    )),
                }
            }
            ToolKind::ArtifactVersions => {
                let input: ArtifactInput = serde_json::from_value(arguments)?;
                match self
                    .client
                    .artifact_versions(&input.group_id, &input.artifact_id)
                    .await
                {
                    Ok(listing) => ToolOutput::ok(render_versions(&listing)),
                    Err(e) => ToolOutput::error(format!(
                        "Error fetching versions for {}:{}: {}",
                        input.group_id, input.artifact_id, e
                    )),
                }
            }
            ToolKind::PomXml => {
                let coords: Coordinates = serde_json::from_value(arguments)?;
                match self
                    .client
                    .manifest(&coords.group_id, &coords.artifact_id, &coords.version)
                    .await
                {
                    Ok(pom) => ToolOutput::ok(render_manifest(&coords, &pom)),
                    Err(e) => ToolOutput::error(format!("Error fetching POM for {}: {}", coords, e)),
                }
            }
            ToolKind::DependencySnippets => {
                let coords: Coordinates = serde_json::from_value(arguments)?;
                match self
                    .client
                    .dependency_snippets(&coords.group_id, &coords.artifact_id, &coords.version)
                    .await
                {
                    Ok(snippets) => ToolOutput::ok(render_snippets(&coords, &snippets)),
                    Err(e) => ToolOutput::error(format!(
                        "Error fetching dependency snippets for {}: {}",
                        coords, e
                    )),
                }
            }
        };

        Ok(output)
    }
}

/// Render a search outcome as one `group:artifact:version` line per hit
pub fn render_search(outcome: &SearchOutcome) -> String {
    let lines: Vec<String> = outcome
        .artifacts
        .iter()
        .map(|artifact| {
            let mut line = format!(
                "{}:{}:{}",
                artifact.group_id, artifact.artifact_id, artifact.version
            );
            if let Some(ref description) = artifact.description {
                line.push_str(&format!(" - {}", description));
            }
            line
        })
        .collect();

    format!(
        "Found {} artifacts for query \"{}\":\n\n{}",
        outcome.artifacts.len(),
        outcome.query,
        lines.join("\n")
    )
}

/// Render a version listing, one version per line
pub fn render_versions(listing: &VersionListing) -> String {
    let lines: Vec<String> = listing
        .versions
        .iter()
        .map(|entry| {
            let mut line = entry.version.clone();
            if let Some(ref date) = entry.release_date {
                line.push_str(&format!(" ({})", date));
            }
            if let Some(count) = entry.vulnerabilities {
                line.push_str(&format!(" - {} vulnerabilities", count));
            }
            line
        })
        .collect();

    format!(
        "Found {} versions for {}:{}:\n\n{}",
        listing.total_versions,
        listing.group_id,
        listing.artifact_id,
        lines.join("\n")
    )
}

/// Render a POM in a fenced XML block
pub fn render_manifest(coords: &Coordinates, pom: &str) -> String {
    format!("POM.xml for {}:\n\n```xml\n{}\n```", coords, pom)
}

/// Render snippets as fenced blocks per build tool
pub fn render_snippets(coords: &Coordinates, snippets: &DependencySnippets) -> String {
    let mut output = format!("Dependency snippets for {}:\n\n", coords);
    output.push_str(&format!("**Maven:**\n```xml\n{}\n```\n\n", snippets.maven));
    output.push_str(&format!("**Gradle:**\n```gradle\n{}\n```\n\n", snippets.gradle));
    if let Some(ref sbt) = snippets.sbt {
        output.push_str(&format!("**SBT:**\n```scala\n{}\n```\n\n", sbt));
    }
    if let Some(ref ivy) = snippets.ivy {
        output.push_str(&format!("**Ivy:**\n```xml\n{}\n```\n\n", ivy));
    }
    output.trim_end().to_string()
}

/// Render the first listed version of an artifact
pub fn render_latest(group_id: &str, artifact_id: &str, artifact: Option<&Artifact>) -> String {
    match artifact {
        Some(artifact) => {
            let mut line = format!(
                "{}:{}:{}",
                artifact.group_id, artifact.artifact_id, artifact.version
            );
            if let Some(ref date) = artifact.last_updated {
                line.push_str(&format!(" ({})", date));
            }
            line
        }
        None => format!("No versions found for {}:{}", group_id, artifact_id),
    }
}

/// Error text for a failed lookup outside of a tool call
pub fn render_error(error: &FetchError) -> String {
    if error.is_blocked() {
        format!("Error: {} Try again later.", error)
    } else {
        format!("Error: {}", error)
    }
}
