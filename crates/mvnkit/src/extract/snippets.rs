//! Dependency snippet extraction
//!
//! Each build tool's declaration lives in a textarea on the version page. The
//! lookup patterns below are tried in order; Maven and Gradle fall back to a
//! synthesized declaration when none of them yields text.

use super::selector::SelectorChain;
use super::Extractor;
use crate::types::{Coordinates, DependencySnippets};
use scraper::Html;
use url::Url;

/// Textarea lookup patterns, `{tool}` is replaced by the build tool name
pub const SNIPPET_PATTERNS: &[&str] = &[
    "#{tool}-a textarea",
    ".{tool} textarea",
    r#"textarea[id*="{tool}"]"#,
];

/// Build tools with a snippet on the version page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    Maven,
    Gradle,
    Sbt,
    Ivy,
}

impl BuildTool {
    /// Name used in element ids and classes
    pub fn name(self) -> &'static str {
        match self {
            BuildTool::Maven => "maven",
            BuildTool::Gradle => "gradle",
            BuildTool::Sbt => "sbt",
            BuildTool::Ivy => "ivy",
        }
    }

    /// Selector chain for this tool's textarea
    pub fn selectors(self) -> SelectorChain {
        SelectorChain::new(
            SNIPPET_PATTERNS
                .iter()
                .map(|pattern| pattern.replace("{tool}", self.name())),
        )
    }

    /// Declaration synthesized from coordinates, for tools that have one
    pub fn fallback(self, coordinates: &Coordinates) -> Option<String> {
        let Coordinates {
            group_id,
            artifact_id,
            version,
        } = coordinates;
        match self {
            BuildTool::Maven => Some(format!(
                "<dependency>\n    <groupId>{group_id}</groupId>\n    <artifactId>{artifact_id}</artifactId>\n    <version>{version}</version>\n</dependency>"
            )),
            BuildTool::Gradle => Some(format!("implementation '{group_id}:{artifact_id}:{version}'")),
            BuildTool::Sbt | BuildTool::Ivy => None,
        }
    }
}

/// Version page extractor for build-tool snippets
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    coordinates: Coordinates,
}

impl SnippetExtractor {
    /// Create an extractor; `coordinates` feed the fallback declarations
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }

    fn snippet(&self, document: &Html, tool: BuildTool) -> Option<String> {
        tool.selectors()
            .first_text(document)
            .or_else(|| tool.fallback(&self.coordinates))
    }
}

impl Extractor for SnippetExtractor {
    type Output = DependencySnippets;

    fn name(&self) -> &'static str {
        "snippets"
    }

    fn extract(&self, document: &Html, _page_url: &Url) -> DependencySnippets {
        DependencySnippets {
            maven: self
                .snippet(document, BuildTool::Maven)
                .unwrap_or_default(),
            gradle: self
                .snippet(document, BuildTool::Gradle)
                .unwrap_or_default(),
            sbt: self.snippet(document, BuildTool::Sbt),
            ivy: self.snippet(document, BuildTool::Ivy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> Coordinates {
        Coordinates::new("com.example", "foo", "1.2.3")
    }

    fn page_url() -> Url {
        Url::parse("https://mvnrepository.com/artifact/com.example/foo/1.2.3").unwrap()
    }

    #[test]
    fn test_fallbacks_when_page_has_no_snippets() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let snippets = SnippetExtractor::new(coords()).extract_html(html, &page_url());

        assert_eq!(
            snippets.maven,
            "<dependency>\n    <groupId>com.example</groupId>\n    <artifactId>foo</artifactId>\n    <version>1.2.3</version>\n</dependency>"
        );
        assert_eq!(snippets.gradle, "implementation 'com.example:foo:1.2.3'");
        assert_eq!(snippets.sbt, None);
        assert_eq!(snippets.ivy, None);
    }

    #[test]
    fn test_snippets_from_tab_panes() {
        let html = r#"<html><body>
            <div id="maven-a"><textarea>  &lt;dependency&gt;maven&lt;/dependency&gt;  </textarea></div>
            <div id="gradle-a"><textarea>implementation group: 'com.example', name: 'foo'</textarea></div>
            <div id="sbt-a"><textarea>libraryDependencies += "com.example" % "foo" % "1.2.3"</textarea></div>
            <div id="ivy-a"><textarea>&lt;dependency org="com.example" name="foo" rev="1.2.3"/&gt;</textarea></div>
        </body></html>"#;
        let snippets = SnippetExtractor::new(coords()).extract_html(html, &page_url());

        assert_eq!(snippets.maven, "<dependency>maven</dependency>");
        assert_eq!(snippets.gradle, "implementation group: 'com.example', name: 'foo'");
        assert_eq!(
            snippets.sbt.as_deref(),
            Some(r#"libraryDependencies += "com.example" % "foo" % "1.2.3""#)
        );
        assert_eq!(
            snippets.ivy.as_deref(),
            Some(r#"<dependency org="com.example" name="foo" rev="1.2.3"/>"#)
        );
    }

    #[test]
    fn test_alternate_layouts() {
        let html = r#"<html><body>
            <div class="maven"><textarea>by class</textarea></div>
            <textarea id="gradle-short">by id fragment</textarea>
        </body></html>"#;
        let snippets = SnippetExtractor::new(coords()).extract_html(html, &page_url());

        assert_eq!(snippets.maven, "by class");
        assert_eq!(snippets.gradle, "by id fragment");
        assert_eq!(snippets.sbt, None);
    }

    #[test]
    fn test_blank_textarea_falls_through_to_next_pattern() {
        let html = r#"<html><body>
            <div id="maven-a"><textarea>   </textarea></div>
            <div class="maven"><textarea>second pattern</textarea></div>
            <div id="sbt-a"><textarea> </textarea></div>
        </body></html>"#;
        let snippets = SnippetExtractor::new(coords()).extract_html(html, &page_url());

        assert_eq!(snippets.maven, "second pattern");
        assert_eq!(snippets.sbt, None);
    }

    #[test]
    fn test_pattern_priority() {
        let html = r#"<html><body>
            <textarea id="maven-other">third</textarea>
            <div class="maven"><textarea>second</textarea></div>
            <div id="maven-a"><textarea>first</textarea></div>
        </body></html>"#;
        let snippets = SnippetExtractor::new(coords()).extract_html(html, &page_url());
        assert_eq!(snippets.maven, "first");
    }

    #[test]
    fn test_selectors_per_tool() {
        assert_eq!(BuildTool::Sbt.selectors().len(), SNIPPET_PATTERNS.len());
        assert_eq!(BuildTool::Gradle.name(), "gradle");
        assert!(BuildTool::Sbt.fallback(&coords()).is_none());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<html><body>
            <div id="maven-a"><textarea>&lt;dependency/&gt;</textarea></div>
            <div id="sbt-a"><textarea>libraryDependencies += "com.example" % "foo" % "1.2.3"</textarea></div>
        </body></html>"#;
        let extractor = SnippetExtractor::new(coords());
        let first = serde_json::to_string(&extractor.extract_html(html, &page_url())).unwrap();
        let second = serde_json::to_string(&extractor.extract_html(html, &page_url())).unwrap();
        assert_eq!(first, second);
    }
}
