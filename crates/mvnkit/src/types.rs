//! Core types for MvnKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder version used when no version token can be read from display text
pub const LATEST_VERSION: &str = "latest";

/// An artifact as listed by the scraped host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Group identifier, e.g. `org.springframework`
    pub group_id: String,

    /// Artifact identifier, e.g. `spring-core`
    pub artifact_id: String,

    /// Version token, or [`LATEST_VERSION`] when unparseable
    pub version: String,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Page on the scraped host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Number of artifacts depending on this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usages: Option<u64>,

    /// Release date of the listed version, as displayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// One row of a version listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    /// Version string
    pub version: String,

    /// Release date, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    /// Known vulnerabilities. Only set when positive; `None` means zero or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<u32>,

    /// Version detail page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Versions of one artifact, in the order the scraped host presents them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionListing {
    pub group_id: String,
    pub artifact_id: String,
    pub versions: Vec<VersionEntry>,
    pub total_versions: usize,
}

impl VersionListing {
    /// Create a listing; the total is taken from the entries
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        versions: Vec<VersionEntry>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            total_versions: versions.len(),
            versions,
        }
    }
}

/// Result of an artifact search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub artifacts: Vec<Artifact>,
    pub total_results: usize,
    pub query: String,
}

impl SearchOutcome {
    /// Create an outcome; the total is taken from the artifacts
    pub fn new(query: impl Into<String>, artifacts: Vec<Artifact>) -> Self {
        Self {
            total_results: artifacts.len(),
            artifacts,
            query: query.into(),
        }
    }
}

/// Build-tool declarations for one artifact version
///
/// `maven` and `gradle` are always populated; `sbt` and `ivy` are only set
/// when the page provided them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DependencySnippets {
    pub maven: String,
    pub gradle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ivy: Option<String>,
}

/// Fully qualified artifact version
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// The group ID of the artifact
    pub group_id: String,
    /// The artifact ID
    pub artifact_id: String,
    /// The version of the artifact
    pub version: String,
}

impl Coordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Repository-relative path of the POM
    pub fn manifest_path(&self) -> String {
        format!(
            "{}/{}/{}/{}-{}.pom",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.artifact_id,
            self.version
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
