//! Search result extraction
//!
//! Handles the search page, where each hit is an `.im` block holding a title
//! link to `/artifact/{group}/{artifact}`, a subtitle and a usage count.

use super::selector::{element_text, SelectorChain};
use super::{absolute_url, Extractor};
use crate::types::{Artifact, LATEST_VERSION};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

/// Leading path segment of artifact pages
const ARTIFACT_SEGMENT: &str = "artifact";

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)*(?:[.-][A-Za-z0-9]+)*").expect("valid version pattern")
});

static GROUPED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:,\d{3})*").expect("valid number pattern"));

/// Search page extractor
///
/// Stops after `max_results` artifacts, in page order.
#[derive(Debug, Clone)]
pub struct SearchExtractor {
    max_results: usize,
    item: SelectorChain,
    title_link: SelectorChain,
    subtitle: SelectorChain,
    usages: SelectorChain,
}

impl SearchExtractor {
    /// Create an extractor keeping at most `max_results` artifacts
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            item: SelectorChain::single(".im"),
            title_link: SelectorChain::single(".im-title a"),
            subtitle: SelectorChain::single(".im-subtitle"),
            usages: SelectorChain::single(".im-usage"),
        }
    }

    fn extract_item(&self, item: ElementRef<'_>, page_url: &Url) -> Option<Artifact> {
        let link = self.title_link.first_in(item)?;
        let href = link.value().attr("href")?;
        let title = element_text(&link);
        if href.is_empty() || title.is_empty() {
            return None;
        }

        let (group_id, artifact_id) = parse_artifact_path(href)?;
        let description = self.subtitle.text_in(item).filter(|s| !s.is_empty());
        let usages = self
            .usages
            .text_in(item)
            .map(|text| parse_usages(&text))
            .unwrap_or(0);

        Some(Artifact {
            group_id,
            artifact_id,
            version: parse_version_token(&title),
            description,
            url: absolute_url(page_url, href),
            usages: Some(usages),
            last_updated: None,
        })
    }
}

impl Extractor for SearchExtractor {
    type Output = Vec<Artifact>;

    fn name(&self) -> &'static str {
        "search"
    }

    fn extract(&self, document: &Html, page_url: &Url) -> Vec<Artifact> {
        let mut artifacts = Vec::new();
        for item in self.item.all(document) {
            if artifacts.len() >= self.max_results {
                break;
            }
            if let Some(artifact) = self.extract_item(item, page_url) {
                artifacts.push(artifact);
            }
        }
        artifacts
    }
}

/// Group and artifact from an `/artifact/{group}/{artifact}[/...]` link
pub(crate) fn parse_artifact_path(href: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = href.split('/').collect();
    if parts.len() < 4 || parts[1] != ARTIFACT_SEGMENT {
        return None;
    }

    let group_id = parts[2];
    let artifact_id = parts[3];
    if group_id.is_empty() || artifact_id.is_empty() {
        return None;
    }

    Some((group_id.to_string(), artifact_id.to_string()))
}

/// First version-looking token in display text, or [`LATEST_VERSION`]
pub(crate) fn parse_version_token(text: &str) -> String {
    VERSION_TOKEN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| LATEST_VERSION.to_string())
}

/// First grouped number (`1,234`) in display text; 0 if none
pub(crate) fn parse_usages(text: &str) -> u64 {
    GROUPED_NUMBER
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0)
}
