//! HTML extraction for scraped pages
//!
//! Design: each extractor turns one kind of page into a typed record. Extraction
//! is a pure function of the parsed document and never fails; missing markup
//! drops the affected record or falls back to synthesized values.

mod search;
pub mod selector;
mod snippets;
mod versions;

pub use search::SearchExtractor;
pub use selector::SelectorChain;
pub use snippets::{BuildTool, SnippetExtractor, SNIPPET_PATTERNS};
pub use versions::VersionExtractor;

use scraper::Html;
use url::Url;

/// Trait for page extractors
///
/// `page_url` is the URL the document was fetched from; relative links are
/// resolved against it.
pub trait Extractor {
    /// Record produced from a page
    type Output;

    /// Unique identifier for this extractor (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Extract a record from a parsed document
    fn extract(&self, document: &Html, page_url: &Url) -> Self::Output;

    /// Parse markup and extract a record
    ///
    /// The parsed document is dropped before returning, so callers can use this
    /// between awaits.
    fn extract_html(&self, html: &str, page_url: &Url) -> Self::Output {
        let document = Html::parse_document(html);
        let output = self.extract(&document, page_url);
        tracing::debug!(extractor = self.name(), url = %page_url, "Extracted page");
        output
    }
}

/// Resolve a link found on a page to an absolute URL
pub(crate) fn absolute_url(page_url: &Url, href: &str) -> Option<String> {
    page_url.join(href).ok().map(String::from)
}
