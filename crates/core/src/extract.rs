//! Combined extraction over one fetched document.
//!
//! Runs the embedded-data layer against the raw markup and the semantic
//! layer against a noise-stripped parse, then resolves the two by
//! source precedence: a parseable structured payload strictly overrides
//! whatever the DOM heuristics found, for both body text and title.

use crate::content::{ExtractedContent, SourceKind};
use crate::embedded::extract_embedded;
use crate::metadata::PageMetadata;
use crate::noise::strip_noise;
use crate::parse::Document;
use crate::semantic::extract_semantic;

/// Extracts content and metadata from raw HTML.
///
/// Infallible by design: any parse or payload problem degrades to an
/// empty result that the quality scorer will band as unprocessable.
pub fn extract_content(html: &str) -> ExtractedContent {
    let raw = Document::parse(html);
    let metadata = PageMetadata::from_document(&raw);

    // Layer 2 scans raw markup; noise stripping would remove the
    // script payloads it reads.
    let embedded = extract_embedded(&raw);

    if let Some(payload) = embedded {
        let title = payload
            .title
            .or_else(|| metadata.best_title().map(str::to_string));
        tracing::info!(kind = ?payload.kind, chars = payload.body_text.chars().count(), "structured payload extracted");
        return ExtractedContent {
            title,
            body_text: payload.body_text,
            metadata,
            source_kind: payload.kind,
            source_confidence: payload.kind.confidence(),
        };
    }

    let stripped = Document::parse(&strip_noise(html));
    if let Some(candidate) = extract_semantic(&stripped) {
        tracing::info!(
            confidence = ?candidate.confidence,
            chars = candidate.body_text.chars().count(),
            "semantic region extracted"
        );
        return ExtractedContent {
            title: metadata.best_title().map(str::to_string),
            body_text: candidate.body_text,
            metadata,
            source_kind: SourceKind::SemanticHtml,
            source_confidence: candidate.confidence,
        };
    }

    ExtractedContent::empty(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SourceConfidence;

    const BODY: &str = "The committee approved the measure after a lengthy debate, \
        citing infrastructure needs across the region and the projected cost savings over a decade.";

    fn article_page() -> String {
        let paragraphs: String = (0..5)
            .map(|i| format!("<p>Paragraph {i}: {BODY}</p>"))
            .collect();
        format!(
            r#"<html><head>
                <title>Static Article</title>
                <meta property="og:title" content="Static Article Headline">
            </head><body>
                <nav>Home | About</nav>
                <article>{paragraphs}</article>
                <footer>Copyright</footer>
            </body></html>"#
        )
    }

    #[test]
    fn test_semantic_extraction_with_noise_removed() {
        let content = extract_content(&article_page());
        assert_eq!(content.source_kind, SourceKind::SemanticHtml);
        assert_eq!(content.source_confidence, SourceConfidence::Medium);
        assert_eq!(content.title.as_deref(), Some("Static Article Headline"));
        assert!(content.body_text.contains("Paragraph 0"));
        assert!(!content.body_text.contains("Home | About"));
        assert!(!content.body_text.contains("Copyright"));
    }

    #[test]
    fn test_structured_payload_overrides_semantic() {
        let html = format!(
            r#"<html><head><title>Page</title></head><body>
                <article><p>Short DOM rendition of the article that the hydration payload supersedes entirely, even at this length.</p></article>
                <script id="__NEXT_DATA__">{{"props":{{"pageProps":{{"article":{{"body":"{BODY}"}}}}}}}}</script>
            </body></html>"#
        );
        let content = extract_content(&html);
        assert_eq!(content.source_kind, SourceKind::SsrNext);
        assert_eq!(content.source_confidence, SourceConfidence::High);
        assert_eq!(content.body_text, BODY);
    }

    #[test]
    fn test_json_ld_title_overrides_og_title() {
        let html = format!(
            r#"<html><head>
                <meta property="og:title" content="OG Title">
                <script type="application/ld+json">{{"@type":"Article","headline":"Declared Headline","articleBody":"{BODY}"}}</script>
            </head><body></body></html>"#
        );
        let content = extract_content(&html);
        assert_eq!(content.title.as_deref(), Some("Declared Headline"));
        assert_eq!(content.source_kind, SourceKind::JsonLd);
    }

    #[test]
    fn test_empty_shell_keeps_metadata() {
        let html = r#"<html><head><title>App</title><meta name="description" content="An app."></head>
            <body><div id="root"></div></body></html>"#;
        let content = extract_content(html);
        assert!(content.is_empty());
        assert_eq!(content.source_kind, SourceKind::None);
        assert_eq!(content.title.as_deref(), Some("App"));
        assert!(content.metadata.has_description());
    }

    #[test]
    fn test_malformed_markup_degrades_to_best_effort() {
        let content = extract_content("<html><body><article><p>broken");
        assert_eq!(content.source_kind, SourceKind::None);
        assert!(content.body_text.is_empty());
    }
}
