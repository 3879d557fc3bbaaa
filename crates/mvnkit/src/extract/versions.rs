//! Version listing extraction

use super::selector::{element_text, SelectorChain};
use super::{absolute_url, Extractor};
use crate::types::VersionEntry;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

/// Marker the site uses for "no known vulnerabilities"
const NO_VULNERABILITIES: &str = "-";

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

/// Artifact page extractor producing version rows in page order
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    row: SelectorChain,
    version_link: SelectorChain,
    date_cell: SelectorChain,
    vulnerability_cell: SelectorChain,
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionExtractor {
    pub fn new() -> Self {
        Self {
            row: SelectorChain::single(".grid.versions tbody tr"),
            version_link: SelectorChain::single("td:first-child a"),
            date_cell: SelectorChain::single("td:nth-child(2)"),
            vulnerability_cell: SelectorChain::single("td:nth-child(3)"),
        }
    }

    fn extract_row(&self, row: ElementRef<'_>, page_url: &Url) -> Option<VersionEntry> {
        let link = self.version_link.first_in(row)?;
        let version = element_text(&link);
        if version.is_empty() {
            return None;
        }

        let release_date = self.date_cell.text_in(row).filter(|s| !s.is_empty());
        let vulnerabilities = self
            .vulnerability_cell
            .text_in(row)
            .and_then(|text| parse_vulnerabilities(&text));
        let url = link
            .value()
            .attr("href")
            .and_then(|href| absolute_url(page_url, href));

        Some(VersionEntry {
            version,
            release_date,
            vulnerabilities,
            url,
        })
    }
}

impl Extractor for VersionExtractor {
    type Output = Vec<VersionEntry>;

    fn name(&self) -> &'static str {
        "versions"
    }

    fn extract(&self, document: &Html, page_url: &Url) -> Vec<VersionEntry> {
        self.row
            .all(document)
            .into_iter()
            .filter_map(|row| self.extract_row(row, page_url))
            .collect()
    }
}

/// Vulnerability count from the indicator cell; `None` unless positive
pub(crate) fn parse_vulnerabilities(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || text == NO_VULNERABILITIES {
        return None;
    }
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|count| *count > 0)
}
