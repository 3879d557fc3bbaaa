//! Ordered CSS selector lists
//!
//! Extraction rules are written as lists of CSS patterns tried in order, so
//! alternate page layouts are handled by adding a pattern rather than a branch.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Prioritized list of CSS selectors
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compile the patterns, dropping any that fail to parse
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = patterns
            .into_iter()
            .filter_map(|pattern| {
                let pattern = pattern.as_ref();
                match Selector::parse(pattern) {
                    Ok(selector) => Some(selector),
                    Err(e) => {
                        warn!(pattern, error = %e, "Ignoring invalid selector");
                        None
                    }
                }
            })
            .collect();
        Self { selectors }
    }

    /// Chain with a single pattern
    pub fn single(pattern: &str) -> Self {
        Self::new([pattern])
    }

    /// Number of usable selectors
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// True if no pattern compiled
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// All elements matched by the first selector that matches anything
    pub fn all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|matches| !matches.is_empty())
            .unwrap_or_default()
    }

    /// First descendant of `scope` matched by any selector, in priority order
    pub fn first_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Trimmed text of the first descendant of `scope` matched by any selector
    pub fn text_in(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first_in(scope).map(|element| element_text(&element))
    }

    /// First non-empty trimmed text in the document, trying selectors in order
    pub fn first_text(&self, document: &Html) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            document
                .select(selector)
                .map(|element| element_text(&element))
                .find(|text| !text.is_empty())
        })
    }
}

/// Concatenated, trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
