//! Extraction result types and the source taxonomy.
//!
//! Every extraction layer produces (or refines) an [`ExtractedContent`].
//! The [`SourceKind`] taxonomy is a closed set with an explicit
//! precedence ordering so that competing candidates from different
//! layers are resolved by one rule instead of scattered conditionals.

use crate::metadata::PageMetadata;

/// Where the body text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Isolated semantic HTML container (`<article>`, `<main>`, ...).
    SemanticHtml,
    /// `application/ld+json` linked-data block.
    JsonLd,
    /// Next.js `__NEXT_DATA__` hydration payload.
    SsrNext,
    /// Nuxt `__NUXT_DATA__` / `window.__NUXT__` hydration payload.
    SsrNuxt,
    /// Text rendered by the headless-browser fallback.
    BrowserRendered,
    /// Nothing usable was found.
    None,
}

impl SourceKind {
    /// Precedence rank used to resolve competing candidates. Structured
    /// payloads always beat heuristic DOM extraction; framework
    /// hydration payloads beat generic linked data.
    pub fn precedence(self) -> u8 {
        match self {
            SourceKind::SsrNext => 5,
            SourceKind::SsrNuxt => 4,
            SourceKind::JsonLd => 3,
            SourceKind::BrowserRendered => 2,
            SourceKind::SemanticHtml => 1,
            SourceKind::None => 0,
        }
    }

    /// The confidence class this source maps to.
    pub fn confidence(self) -> SourceConfidence {
        match self {
            SourceKind::SsrNext | SourceKind::SsrNuxt | SourceKind::JsonLd => SourceConfidence::High,
            SourceKind::SemanticHtml | SourceKind::BrowserRendered => SourceConfidence::Medium,
            SourceKind::None => SourceConfidence::Low,
        }
    }
}

/// How much we trust the extraction path that produced the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfidence {
    Low,
    Medium,
    High,
}

/// The combined result of the extraction layers for one document.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Best available page title.
    pub title: Option<String>,
    /// Extracted body text, newline-separated by block.
    pub body_text: String,
    /// Page-level metadata, harvested independently of the body.
    pub metadata: PageMetadata,
    /// Which extraction path produced `body_text`.
    pub source_kind: SourceKind,
    /// Confidence class of that path.
    pub source_confidence: SourceConfidence,
}

impl ExtractedContent {
    /// An empty result carrying only metadata. Used when every layer
    /// came up short, and for fetch failures (scored as zero).
    pub fn empty(metadata: PageMetadata) -> Self {
        let title = metadata.best_title().map(str::to_string);
        Self {
            title,
            body_text: String::new(),
            metadata,
            source_kind: SourceKind::None,
            source_confidence: SourceConfidence::Low,
        }
    }

    /// Whether no usable body text was extracted.
    pub fn is_empty(&self) -> bool {
        self.body_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_sources_outrank_semantic() {
        assert!(SourceKind::SsrNext.precedence() > SourceKind::SemanticHtml.precedence());
        assert!(SourceKind::SsrNuxt.precedence() > SourceKind::SemanticHtml.precedence());
        assert!(SourceKind::JsonLd.precedence() > SourceKind::SemanticHtml.precedence());
    }

    #[test]
    fn test_hydration_outranks_linked_data() {
        assert!(SourceKind::SsrNext.precedence() > SourceKind::JsonLd.precedence());
        assert!(SourceKind::SsrNuxt.precedence() > SourceKind::JsonLd.precedence());
    }

    #[test]
    fn test_confidence_mapping() {
        assert_eq!(SourceKind::JsonLd.confidence(), SourceConfidence::High);
        assert_eq!(SourceKind::SemanticHtml.confidence(), SourceConfidence::Medium);
        assert_eq!(SourceKind::BrowserRendered.confidence(), SourceConfidence::Medium);
        assert_eq!(SourceKind::None.confidence(), SourceConfidence::Low);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(SourceConfidence::High > SourceConfidence::Medium);
        assert!(SourceConfidence::Medium > SourceConfidence::Low);
    }

    #[test]
    fn test_empty_content() {
        let content = ExtractedContent::empty(PageMetadata::default());
        assert!(content.is_empty());
        assert_eq!(content.source_kind, SourceKind::None);
        assert_eq!(content.source_confidence, SourceConfidence::Low);
    }
}
